// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod filter_tests;
mod numbering_tests;
mod stats_tests;

use fieldwork_domain::{AreaCode, JobStatus, WorkOrder, WorkOrderStatus};

/// Builds a valid pending work order for tests.
///
/// `created_at` doubles as `updated_at`; distinct values keep list ordering
/// deterministic.
pub fn sample_work_order(number: &str, created_at: &str) -> WorkOrder {
    WorkOrder {
        id: None,
        work_order_number: number.to_string(),
        visit_date: Some("2025-06-10".parse().unwrap()),
        work_order_type: String::from("Installation"),
        customer_name: String::from("Acme Utilities"),
        customer_phone: String::from("555-0100"),
        area: String::from("North Ridge"),
        area_code: AreaCode::new("NR-01"),
        supervisor: String::from("Sam Rivera"),
        technician: String::from("Kim Doyle"),
        description: String::from("Replace meter"),
        hours: None,
        work_order_status: WorkOrderStatus::Pending,
        job_status: JobStatus::NotAttend,
        distribution: String::from("East"),
        completion_date: None,
        reschedule_date: None,
        remarks: String::new(),
        created_by: String::from("test-agent"),
        updated_by: String::from("test-agent"),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
        attachments: Vec::new(),
    }
}
