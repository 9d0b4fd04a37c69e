// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core domain types for the Fieldwork work-order system.
//!
//! This crate holds the work-order entity, its lifecycle status machine,
//! field validation, and flexible date parsing. It performs no I/O; the
//! persistence and API layers build on it.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod dates;
mod error;
mod status;
mod types;
mod validation;
mod work_order;

pub use dates::parse_flexible_date;
pub use error::DomainError;
pub use status::{DISPLAY_STATUSES, WorkOrderStatus, validate_display_status};
pub use types::{AreaCode, Attachment, JobStatus};
pub use validation::{
    FieldViolation, MAX_AREA_CODE_LEN, MAX_AREA_LEN, MAX_ASSIGNEE_LEN, MAX_CUSTOMER_NAME_LEN,
    MAX_DESCRIPTION_LEN, MAX_HOURS, MAX_TYPE_LEN, validate_remarks_precondition,
    validate_work_order_fields, validate_work_order_number,
};
pub use work_order::WorkOrder;
