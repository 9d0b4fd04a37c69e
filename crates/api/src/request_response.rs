// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs.
//!
//! These are distinct from domain types and represent the API contract.
//! Field names follow the wire convention (camelCase).

use fieldwork_domain::{Attachment, WorkOrder};
use fieldwork_persistence::WorkOrderStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API request to create a new work order.
///
/// `workOrderNumber` is optional: when absent, the numbering service
/// generates one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWorkOrderRequest {
    /// Explicit work-order number, normally omitted.
    pub work_order_number: Option<String>,
    /// Scheduled visit date (ISO `YYYY-MM-DD`).
    pub visit_date: Option<String>,
    /// Work-order type.
    pub work_order_type: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Area description.
    pub area: String,
    /// Area code (normalized to uppercase).
    pub area_code: String,
    /// Supervisor name (free text).
    pub supervisor: String,
    /// Technician name (free text).
    pub technician: String,
    /// Work description.
    pub description: String,
    /// Hours worked.
    pub hours: Option<f64>,
    /// Initial lifecycle status; defaults to Pending.
    pub work_order_status: Option<String>,
    /// Site-visit attendance; defaults to Not Attend.
    pub job_status: Option<String>,
    /// Distribution.
    pub distribution: String,
    /// Remarks.
    pub remarks: String,
}

/// API request for a full work-order update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateWorkOrderRequest {
    /// Scheduled visit date (ISO `YYYY-MM-DD`).
    pub visit_date: Option<String>,
    /// Work-order type.
    pub work_order_type: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Area description.
    pub area: String,
    /// Area code (normalized to uppercase).
    pub area_code: String,
    /// Supervisor name (free text).
    pub supervisor: String,
    /// Technician name (free text).
    pub technician: String,
    /// Work description.
    pub description: String,
    /// Hours worked.
    pub hours: Option<f64>,
    /// Lifecycle status; transitions are validated.
    pub work_order_status: Option<String>,
    /// Site-visit attendance.
    pub job_status: Option<String>,
    /// Distribution.
    pub distribution: String,
    /// Completion timestamp (RFC 3339 UTC).
    pub completion_date: Option<String>,
    /// Reschedule date (ISO `YYYY-MM-DD`).
    pub reschedule_date: Option<String>,
    /// Remarks.
    pub remarks: String,
}

/// API request for a partial status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkOrderStatusRequest {
    /// The requested status.
    pub status: String,
    /// Remarks; required when entering Rescheduled or On Hold.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Explicit completion timestamp; auto-stamped when entering Completed
    /// without one.
    #[serde(default)]
    pub completion_date: Option<String>,
    /// New visit date when rescheduling (ISO `YYYY-MM-DD`).
    #[serde(default)]
    pub reschedule_date: Option<String>,
}

/// API request to list work orders.
///
/// Every filter is independently optional; filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListWorkOrdersRequest {
    /// Exact status match (display vocabulary).
    pub status: Option<String>,
    /// Exact type match.
    pub work_order_type: Option<String>,
    /// Exact distribution match.
    pub distribution: Option<String>,
    /// Exact supervisor match.
    pub supervisor: Option<String>,
    /// Exact technician match.
    pub technician: Option<String>,
    /// Case-insensitive substring match on area.
    pub area: Option<String>,
    /// Area code (normalized to uppercase before matching).
    pub area_code: Option<String>,
    /// Inclusive visit-date lower bound (ISO `YYYY-MM-DD`).
    pub visit_date_from: Option<String>,
    /// Inclusive visit-date upper bound (ISO `YYYY-MM-DD`).
    pub visit_date_to: Option<String>,
    /// Free-text search across customer name, description, and number.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size; capped server-side.
    pub page_size: Option<i64>,
}

/// An attachment on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    /// The attachment URL.
    pub url: String,
    /// The original filename.
    pub filename: String,
    /// Upload timestamp (RFC 3339 UTC).
    pub uploaded_at: String,
    /// Display name of the uploader.
    pub uploaded_by: String,
}

impl From<Attachment> for AttachmentDto {
    fn from(attachment: Attachment) -> Self {
        Self {
            url: attachment.url,
            filename: attachment.filename,
            uploaded_at: attachment.uploaded_at,
            uploaded_by: attachment.uploaded_by,
        }
    }
}

/// A full work order on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDto {
    /// Internal identifier.
    pub id: i64,
    /// Human-facing unique number.
    pub work_order_number: String,
    /// Scheduled visit date (ISO `YYYY-MM-DD`).
    pub visit_date: Option<String>,
    /// Work-order type.
    pub work_order_type: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Area description.
    pub area: String,
    /// Uppercase area code.
    pub area_code: String,
    /// Supervisor name.
    pub supervisor: String,
    /// Technician name.
    pub technician: String,
    /// Work description.
    pub description: String,
    /// Hours worked.
    pub hours: Option<f64>,
    /// Lifecycle status.
    pub work_order_status: String,
    /// Site-visit attendance.
    pub job_status: String,
    /// Distribution.
    pub distribution: String,
    /// Completion timestamp (RFC 3339 UTC).
    pub completion_date: Option<String>,
    /// Reschedule date (ISO `YYYY-MM-DD`).
    pub reschedule_date: Option<String>,
    /// Remarks.
    pub remarks: String,
    /// Display name of the creator.
    pub created_by: String,
    /// Display name of the last updater.
    pub updated_by: String,
    /// Creation timestamp (RFC 3339 UTC).
    pub created_at: String,
    /// Last-update timestamp (RFC 3339 UTC).
    pub updated_at: String,
    /// Attached files.
    pub attachments: Vec<AttachmentDto>,
}

impl From<WorkOrder> for WorkOrderDto {
    fn from(order: WorkOrder) -> Self {
        Self {
            id: order.id.unwrap_or_default(),
            work_order_number: order.work_order_number,
            visit_date: order.visit_date.map(|d| d.to_string()),
            work_order_type: order.work_order_type,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            area: order.area,
            area_code: order.area_code.value().to_string(),
            supervisor: order.supervisor,
            technician: order.technician,
            description: order.description,
            hours: order.hours,
            work_order_status: order.work_order_status.as_str().to_string(),
            job_status: order.job_status.as_str().to_string(),
            distribution: order.distribution,
            completion_date: order.completion_date,
            reschedule_date: order.reschedule_date.map(|d| d.to_string()),
            remarks: order.remarks,
            created_by: order.created_by,
            updated_by: order.updated_by,
            created_at: order.created_at,
            updated_at: order.updated_at,
            attachments: order
                .attachments
                .into_iter()
                .map(AttachmentDto::from)
                .collect(),
        }
    }
}

/// API response for a work-order list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkOrdersResponse {
    /// The matching page of work orders, newest first.
    pub items: Vec<WorkOrderDto>,
    /// Total matching records, ignoring pagination.
    pub total: i64,
    /// 1-based page number.
    pub page: i64,
    /// Page size used.
    pub page_size: i64,
}

/// API request to attach a file to a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttachmentRequest {
    /// The attachment URL.
    pub url: String,
    /// The original filename.
    pub filename: String,
}

/// API response with aggregated statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Total records in scope.
    pub total: i64,
    /// Record count per status.
    pub by_status: BTreeMap<String, i64>,
    /// Record count per type.
    pub by_type: BTreeMap<String, i64>,
    /// Records with a past visit date and a non-terminal status.
    pub overdue_count: i64,
    /// Records in Completed status.
    pub completed_count: i64,
    /// Percentage of Completed records, rounded to two decimals; 0 when the
    /// set is empty.
    pub completion_rate: f64,
    /// Mean hours from visit to completion; 0 when no record qualifies.
    pub avg_completion_hours: f64,
}

impl From<WorkOrderStats> for StatsResponse {
    fn from(stats: WorkOrderStats) -> Self {
        Self {
            total: stats.total,
            by_status: stats.by_status,
            by_type: stats.by_type,
            overdue_count: stats.overdue_count,
            completed_count: stats.completed_count,
            completion_rate: stats.completion_rate,
            avg_completion_hours: stats.avg_completion_hours,
        }
    }
}

/// Generic message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// A success message.
    pub message: String,
}

/// A row-scoped import problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIssue {
    /// 1-based data-row number (excluding the header row).
    pub row: usize,
    /// The source column involved, when attributable to one.
    pub column: Option<String>,
    /// A human-readable description.
    pub message: String,
}

/// A row skipped before creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    /// 1-based data-row number (excluding the header row).
    pub row: usize,
    /// Why the row was skipped.
    pub reason: String,
}

/// Import progress report, queryable mid-flight and final.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Total data rows in the file.
    pub total: usize,
    /// Rows consumed so far, including skipped and failed rows.
    pub processed: usize,
    /// Rows that became stored records.
    pub success_count: usize,
    /// Row-scoped errors (the row was not created).
    pub errors: Vec<RowIssue>,
    /// Row-scoped warnings (the row was still created).
    pub warnings: Vec<RowIssue>,
    /// Rows skipped before creation.
    pub skipped: Vec<SkippedRow>,
    /// True once cancellation has been requested.
    pub cancelled: bool,
    /// True once no further rows will be processed.
    pub finished: bool,
}
