// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs mapping the diesel schema to and from domain entities.

use crate::diesel_schema::{attachments, work_orders};
use crate::error::PersistenceError;
use chrono::NaiveDate;
use diesel::prelude::*;
use fieldwork_domain::{AreaCode, Attachment, JobStatus, WorkOrder, WorkOrderStatus};

/// A full work-order row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct WorkOrderRow {
    pub id: i64,
    pub work_order_number: String,
    pub visit_date: Option<String>,
    pub work_order_type: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub area: String,
    pub area_code: String,
    pub supervisor: String,
    pub technician: String,
    pub description: String,
    pub hours: Option<f64>,
    pub work_order_status: String,
    pub job_status: String,
    pub distribution: String,
    pub completion_date: Option<String>,
    pub reschedule_date: Option<String>,
    pub remarks: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: i32,
    pub deleted_at: Option<String>,
    pub deleted_by: Option<String>,
}

impl WorkOrderRow {
    /// Converts a stored row plus its attachments into a domain work order.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored status string or date no longer parses,
    /// which indicates row corruption.
    pub fn into_domain(self, attachments: Vec<Attachment>) -> Result<WorkOrder, PersistenceError> {
        let work_order_status: WorkOrderStatus = self
            .work_order_status
            .parse()
            .map_err(|e| PersistenceError::CorruptRow(format!("row {}: {e}", self.id)))?;
        let job_status: JobStatus = self
            .job_status
            .parse()
            .map_err(|e| PersistenceError::CorruptRow(format!("row {}: {e}", self.id)))?;
        let visit_date: Option<NaiveDate> = parse_stored_date(self.visit_date, self.id)?;
        let reschedule_date: Option<NaiveDate> = parse_stored_date(self.reschedule_date, self.id)?;

        Ok(WorkOrder {
            id: Some(self.id),
            work_order_number: self.work_order_number,
            visit_date,
            work_order_type: self.work_order_type,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            area: self.area,
            area_code: AreaCode::new(&self.area_code),
            supervisor: self.supervisor,
            technician: self.technician,
            description: self.description,
            hours: self.hours,
            work_order_status,
            job_status,
            distribution: self.distribution,
            completion_date: self.completion_date,
            reschedule_date,
            remarks: self.remarks,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_deleted: self.is_deleted != 0,
            deleted_at: self.deleted_at,
            deleted_by: self.deleted_by,
            attachments,
        })
    }
}

fn parse_stored_date(
    value: Option<String>,
    row_id: i64,
) -> Result<Option<NaiveDate>, PersistenceError> {
    value
        .map(|s| {
            s.parse().map_err(|_| {
                PersistenceError::CorruptRow(format!("row {row_id}: invalid stored date '{s}'"))
            })
        })
        .transpose()
}

/// Insertable work-order row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = work_orders)]
pub struct NewWorkOrderRow {
    pub work_order_number: String,
    pub visit_date: Option<String>,
    pub work_order_type: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub area: String,
    pub area_code: String,
    pub supervisor: String,
    pub technician: String,
    pub description: String,
    pub hours: Option<f64>,
    pub work_order_status: String,
    pub job_status: String,
    pub distribution: String,
    pub completion_date: Option<String>,
    pub reschedule_date: Option<String>,
    pub remarks: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: i32,
}

impl NewWorkOrderRow {
    #[must_use]
    pub fn from_domain(order: &WorkOrder) -> Self {
        Self {
            work_order_number: order.work_order_number.clone(),
            visit_date: order.visit_date.map(|d| d.to_string()),
            work_order_type: order.work_order_type.clone(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            area: order.area.clone(),
            area_code: order.area_code.value().to_string(),
            supervisor: order.supervisor.clone(),
            technician: order.technician.clone(),
            description: order.description.clone(),
            hours: order.hours,
            work_order_status: order.work_order_status.as_str().to_string(),
            job_status: order.job_status.as_str().to_string(),
            distribution: order.distribution.clone(),
            completion_date: order.completion_date.clone(),
            reschedule_date: order.reschedule_date.map(|d| d.to_string()),
            remarks: order.remarks.clone(),
            created_by: order.created_by.clone(),
            updated_by: order.updated_by.clone(),
            created_at: order.created_at.clone(),
            updated_at: order.updated_at.clone(),
            is_deleted: i32::from(order.is_deleted),
        }
    }
}

/// Changeset for full work-order updates.
///
/// `work_order_number`, `created_by` and `created_at` are immutable after
/// creation and deliberately absent.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = work_orders)]
#[diesel(treat_none_as_null = true)]
pub struct WorkOrderChangeset {
    pub visit_date: Option<String>,
    pub work_order_type: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub area: String,
    pub area_code: String,
    pub supervisor: String,
    pub technician: String,
    pub description: String,
    pub hours: Option<f64>,
    pub work_order_status: String,
    pub job_status: String,
    pub distribution: String,
    pub completion_date: Option<String>,
    pub reschedule_date: Option<String>,
    pub remarks: String,
    pub updated_by: String,
    pub updated_at: String,
}

impl WorkOrderChangeset {
    #[must_use]
    pub fn from_domain(order: &WorkOrder) -> Self {
        Self {
            visit_date: order.visit_date.map(|d| d.to_string()),
            work_order_type: order.work_order_type.clone(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            area: order.area.clone(),
            area_code: order.area_code.value().to_string(),
            supervisor: order.supervisor.clone(),
            technician: order.technician.clone(),
            description: order.description.clone(),
            hours: order.hours,
            work_order_status: order.work_order_status.as_str().to_string(),
            job_status: order.job_status.as_str().to_string(),
            distribution: order.distribution.clone(),
            completion_date: order.completion_date.clone(),
            reschedule_date: order.reschedule_date.map(|d| d.to_string()),
            remarks: order.remarks.clone(),
            updated_by: order.updated_by.clone(),
            updated_at: order.updated_at.clone(),
        }
    }
}

/// A stored attachment row.
#[derive(Debug, Clone, Queryable)]
pub struct AttachmentRow {
    pub id: i64,
    pub work_order_id: i64,
    pub url: String,
    pub filename: String,
    pub uploaded_at: String,
    pub uploaded_by: String,
}

impl AttachmentRow {
    #[must_use]
    pub fn into_domain(self) -> Attachment {
        Attachment {
            url: self.url,
            filename: self.filename,
            uploaded_at: self.uploaded_at,
            uploaded_by: self.uploaded_by,
        }
    }
}

/// Insertable attachment row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attachments)]
pub struct NewAttachmentRow {
    pub work_order_id: i64,
    pub url: String,
    pub filename: String,
    pub uploaded_at: String,
    pub uploaded_by: String,
}
