// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::status::WorkOrderStatus;
use crate::work_order::WorkOrder;

/// Maximum length of the work-order type.
pub const MAX_TYPE_LEN: usize = 100;
/// Maximum length of the customer name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 200;
/// Maximum length of the area description.
pub const MAX_AREA_LEN: usize = 100;
/// Maximum length of the area code.
pub const MAX_AREA_CODE_LEN: usize = 20;
/// Maximum length of supervisor and technician names.
pub const MAX_ASSIGNEE_LEN: usize = 100;
/// Maximum length of the work description.
pub const MAX_DESCRIPTION_LEN: usize = 2000;
/// Inclusive upper bound for hours worked.
pub const MAX_HOURS: f64 = 100.0;

/// A single field constraint violation.
///
/// Validation collects every violation rather than stopping at the first, so
/// callers can report them all in one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// The field name.
    pub field: String,
    /// A human-readable description of the violation.
    pub reason: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn check_len(violations: &mut Vec<FieldViolation>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        violations.push(FieldViolation {
            field: field.to_string(),
            reason: format!("must be at most {max} characters"),
        });
    }
}

/// Validates the length and range constraints of a work order's fields.
///
/// All constraints are checked; the returned list contains one entry per
/// violated field. An empty result means the order is valid.
///
/// # Errors
///
/// Returns the full list of `FieldViolation`s if any constraint is violated.
pub fn validate_work_order_fields(order: &WorkOrder) -> Result<(), Vec<FieldViolation>> {
    let mut violations: Vec<FieldViolation> = Vec::new();

    check_len(
        &mut violations,
        "workOrderType",
        &order.work_order_type,
        MAX_TYPE_LEN,
    );
    check_len(
        &mut violations,
        "customerName",
        &order.customer_name,
        MAX_CUSTOMER_NAME_LEN,
    );
    check_len(&mut violations, "area", &order.area, MAX_AREA_LEN);
    check_len(
        &mut violations,
        "areaCode",
        order.area_code.value(),
        MAX_AREA_CODE_LEN,
    );
    check_len(
        &mut violations,
        "supervisor",
        &order.supervisor,
        MAX_ASSIGNEE_LEN,
    );
    check_len(
        &mut violations,
        "technician",
        &order.technician,
        MAX_ASSIGNEE_LEN,
    );
    check_len(
        &mut violations,
        "description",
        &order.description,
        MAX_DESCRIPTION_LEN,
    );

    if let Some(hours) = order.hours {
        if !(0.0..=MAX_HOURS).contains(&hours) || !hours.is_finite() {
            violations.push(FieldViolation {
                field: String::from("hours"),
                reason: format!("must be between 0 and {MAX_HOURS}"),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Enforces the remarks precondition for a status transition.
///
/// Entering Rescheduled or On Hold requires non-empty remarks. The check is
/// skipped for an idempotent self-transition since the order is already in
/// that state.
///
/// # Errors
///
/// Returns `DomainError::RemarksRequired` if the target status requires
/// remarks and the supplied remarks are empty or whitespace.
pub fn validate_remarks_precondition(
    current: WorkOrderStatus,
    requested: WorkOrderStatus,
    remarks: &str,
) -> Result<(), DomainError> {
    if current != requested && requested.requires_remarks() && remarks.trim().is_empty() {
        return Err(DomainError::RemarksRequired {
            entering: requested.as_str().to_string(),
        });
    }
    Ok(())
}

/// Validates the shape of a work-order number.
///
/// Accepts both the primary shape `WO<YYYYMMDD><seq>` and the hyphenated
/// collision fallback `WO-<YYYYMMDD>-<seq>`.
///
/// # Errors
///
/// Returns `DomainError::InvalidWorkOrderNumber` if the number does not match
/// either shape.
pub fn validate_work_order_number(number: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidWorkOrderNumber {
        number: number.to_string(),
    };

    let rest: &str = number.strip_prefix("WO").ok_or_else(invalid)?;
    let (date_part, seq_part): (&str, &str) = if let Some(stripped) = rest.strip_prefix('-') {
        stripped.split_once('-').ok_or_else(invalid)?
    } else if rest.len() > 8 {
        rest.split_at(8)
    } else {
        return Err(invalid());
    };

    if date_part.len() == 8
        && !seq_part.is_empty()
        && date_part.chars().all(|c| c.is_ascii_digit())
        && seq_part.chars().all(|c| c.is_ascii_digit())
    {
        Ok(())
    } else {
        Err(invalid())
    }
}
