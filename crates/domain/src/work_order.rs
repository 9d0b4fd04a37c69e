// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The central work-order entity.

use crate::types::{AreaCode, Attachment, JobStatus};
use crate::status::WorkOrderStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A field-service work order.
///
/// `id` is the canonical internal identifier assigned by the store.
/// `work_order_number` is the human-facing identifier; it is globally unique
/// and immutable after creation.
///
/// `supervisor` and `technician` are deliberately denormalized free-text
/// names, not references to a user entity: the contract allows arbitrary,
/// non-registered names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Canonical internal identifier. `None` before first persistence.
    pub id: Option<i64>,
    /// Human-facing unique number, uppercase, `WO<YYYYMMDD><seq>`.
    pub work_order_number: String,
    /// Scheduled site-visit date.
    pub visit_date: Option<NaiveDate>,
    /// Free-text order type (installation, maintenance, ...).
    pub work_order_type: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone, free text.
    pub customer_phone: String,
    /// Area description.
    pub area: String,
    /// Normalized uppercase area code.
    pub area_code: AreaCode,
    /// Assigned supervisor (free-text name).
    pub supervisor: String,
    /// Assigned technician (free-text name).
    pub technician: String,
    /// Work description.
    pub description: String,
    /// Hours worked, 0-100.
    pub hours: Option<f64>,
    /// Canonical lifecycle status.
    pub work_order_status: WorkOrderStatus,
    /// Site-visit attendance.
    pub job_status: JobStatus,
    /// Distribution, free string derived by dispatch.
    pub distribution: String,
    /// Completion timestamp (RFC 3339 UTC). Auto-stamped when the order
    /// enters Completed without an explicit value.
    pub completion_date: Option<String>,
    /// New visit date when rescheduled.
    pub reschedule_date: Option<NaiveDate>,
    /// Operator remarks. Required when entering Rescheduled or On Hold.
    pub remarks: String,
    /// Display name of the creating identity.
    pub created_by: String,
    /// Display name of the last mutating identity.
    pub updated_by: String,
    /// Creation timestamp (RFC 3339 UTC).
    pub created_at: String,
    /// Last-update timestamp (RFC 3339 UTC).
    pub updated_at: String,
    /// Soft-delete flag. Deleted records are excluded from every read path
    /// but retained in storage.
    pub is_deleted: bool,
    /// Soft-delete timestamp (RFC 3339 UTC).
    pub deleted_at: Option<String>,
    /// Display name of the deleting identity.
    pub deleted_by: Option<String>,
    /// Attached files.
    pub attachments: Vec<Attachment>,
}

impl WorkOrder {
    /// Returns true if the order is overdue: its visit date is strictly
    /// before `today` and its status is not terminal.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.visit_date
            .is_some_and(|visit| visit < today && !self.work_order_status.is_terminal())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::status::WorkOrderStatus;

    fn order(status: WorkOrderStatus, visit: Option<&str>) -> WorkOrder {
        WorkOrder {
            id: Some(1),
            work_order_number: String::from("WO202501100001"),
            visit_date: visit.map(|v| v.parse().unwrap()),
            work_order_type: String::from("Maintenance"),
            customer_name: String::from("Acme"),
            customer_phone: String::new(),
            area: String::new(),
            area_code: crate::types::AreaCode::new(""),
            supervisor: String::new(),
            technician: String::new(),
            description: String::new(),
            hours: None,
            work_order_status: status,
            job_status: crate::types::JobStatus::NotAttend,
            distribution: String::new(),
            completion_date: None,
            reschedule_date: None,
            remarks: String::new(),
            created_by: String::from("tester"),
            updated_by: String::from("tester"),
            created_at: String::from("2025-01-01T00:00:00Z"),
            updated_at: String::from("2025-01-01T00:00:00Z"),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_overdue_requires_past_visit_and_open_status() {
        let today: NaiveDate = "2025-06-01".parse().unwrap();

        assert!(order(WorkOrderStatus::Pending, Some("2025-05-20")).is_overdue(today));
        assert!(!order(WorkOrderStatus::Completed, Some("2025-05-20")).is_overdue(today));
        assert!(!order(WorkOrderStatus::Cancelled, Some("2025-05-20")).is_overdue(today));
        assert!(!order(WorkOrderStatus::Pending, Some("2025-06-01")).is_overdue(today));
        assert!(!order(WorkOrderStatus::Pending, None).is_overdue(today));
    }
}
