// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A work-order status string is not a canonical transition state.
    InvalidWorkOrderStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// A display status string is not in the display vocabulary.
    InvalidDisplayStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// A job status string is not recognized.
    InvalidJobStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// The statuses that are legal from `from`.
        allowed: Vec<String>,
    },
    /// A required remarks value is missing for this transition.
    RemarksRequired {
        /// The status being entered.
        entering: String,
    },
    /// A field value violates its length or range constraint.
    InvalidField {
        /// The field name.
        field: String,
        /// A human-readable description of the violation.
        reason: String,
    },
    /// A work-order number does not match the expected shape.
    InvalidWorkOrderNumber {
        /// The rejected number.
        number: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWorkOrderStatus { status } => {
                write!(f, "Invalid work-order status: '{status}'")
            }
            Self::InvalidDisplayStatus { status } => {
                write!(f, "Invalid display status: '{status}'")
            }
            Self::InvalidJobStatus { status } => {
                write!(f, "Invalid job status: '{status}'")
            }
            Self::InvalidStatusTransition { from, to, allowed } => {
                write!(
                    f,
                    "Cannot transition from '{from}' to '{to}'; allowed next statuses: [{}]",
                    allowed.join(", ")
                )
            }
            Self::RemarksRequired { entering } => {
                write!(f, "Entering '{entering}' requires non-empty remarks")
            }
            Self::InvalidField { field, reason } => {
                write!(f, "Invalid value for field '{field}': {reason}")
            }
            Self::InvalidWorkOrderNumber { number } => {
                write!(f, "Invalid work-order number: '{number}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
