// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Export formatting.
//!
//! Both formats emit the columns of the shared mapping, in mapping order,
//! under the mapping's current labels. A file exported here re-imports
//! cleanly through the bulk import pipeline.

use crate::error::ApiError;
use crate::mapping::COLUMN_MAP;
use fieldwork_domain::WorkOrder;
use rust_xlsxwriter::{Color, Format, Workbook};

/// Header fill for the styled spreadsheet export.
const HEADER_FILL: Color = Color::RGB(0x4472C4);
/// Alternating row fill for the styled spreadsheet export.
const STRIPE_FILL: Color = Color::RGB(0xD9E1F2);

/// Renders a work order's value for one mapped column.
fn field_value(order: &WorkOrder, field: &str) -> String {
    match field {
        "workOrderNumber" => order.work_order_number.clone(),
        "visitDate" => order.visit_date.map(|d| d.to_string()).unwrap_or_default(),
        "workOrderType" => order.work_order_type.clone(),
        "customerName" => order.customer_name.clone(),
        "customerPhone" => order.customer_phone.clone(),
        "area" => order.area.clone(),
        "areaCode" => order.area_code.value().to_string(),
        "supervisor" => order.supervisor.clone(),
        "technician" => order.technician.clone(),
        "description" => order.description.clone(),
        "hours" => order.hours.map(|h| h.to_string()).unwrap_or_default(),
        "workOrderStatus" => order.work_order_status.as_str().to_string(),
        "jobStatus" => order.job_status.as_str().to_string(),
        "distribution" => order.distribution.clone(),
        "completionDate" => order.completion_date.clone().unwrap_or_default(),
        "rescheduleDate" => order
            .reschedule_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        "remarks" => order.remarks.clone(),
        "agentName" => order.created_by.clone(),
        _ => String::new(),
    }
}

/// Exports work orders as CSV bytes.
///
/// # Errors
///
/// Returns `ApiError::Internal` if serialization fails.
pub fn export_csv(orders: &[WorkOrder]) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let headers: Vec<&str> = COLUMN_MAP.iter().map(|spec| spec.label).collect();
    writer.write_record(&headers).map_err(|e| ApiError::Internal {
        message: format!("CSV export failed: {e}"),
    })?;

    for order in orders {
        let record: Vec<String> = COLUMN_MAP
            .iter()
            .map(|spec| field_value(order, spec.field))
            .collect();
        writer.write_record(&record).map_err(|e| ApiError::Internal {
            message: format!("CSV export failed: {e}"),
        })?;
    }

    writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("CSV export failed: {e}"),
    })
}

/// Exports work orders as a styled `.xlsx` workbook.
///
/// The header row is bold on a colored fill; data rows alternate a light
/// stripe for readability.
///
/// # Errors
///
/// Returns `ApiError::Internal` if workbook generation fails.
pub fn export_xlsx(orders: &[WorkOrder]) -> Result<Vec<u8>, ApiError> {
    let internal = |e: rust_xlsxwriter::XlsxError| ApiError::Internal {
        message: format!("Spreadsheet export failed: {e}"),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format: Format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(HEADER_FILL);
    let stripe_format: Format = Format::new().set_background_color(STRIPE_FILL);

    for (col, spec) in COLUMN_MAP.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| ApiError::Internal {
            message: String::from("Too many export columns"),
        })?;
        worksheet
            .write_string_with_format(0, col, spec.label, &header_format)
            .map_err(internal)?;
        worksheet.set_column_width(col, 18).map_err(internal)?;
    }

    for (idx, order) in orders.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| ApiError::Internal {
            message: String::from("Too many export rows"),
        })?;
        let striped: bool = idx % 2 == 1;
        for (col, spec) in COLUMN_MAP.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| ApiError::Internal {
                message: String::from("Too many export columns"),
            })?;
            let value: String = field_value(order, spec.field);
            if striped {
                worksheet
                    .write_string_with_format(row, col, &value, &stripe_format)
                    .map_err(internal)?;
            } else {
                worksheet.write_string(row, col, &value).map_err(internal)?;
            }
        }
    }

    workbook.save_to_buffer().map_err(internal)
}
