// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fieldwork_domain::{DomainError, FieldViolation};
use fieldwork_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the agent does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// One or more fields violated their constraints.
    ///
    /// Always carries the full list of violations, never just the first.
    ValidationFailed {
        /// The violated fields with reasons.
        violations: Vec<FieldViolation>,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A uniqueness conflict occurred.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An uploaded file could not be read as tabular data.
    InvalidFileFormat {
        /// The reason the file was rejected.
        reason: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::ValidationFailed { violations } => {
                let detail: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "Validation failed: {}", detail.join("; "))
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidFileFormat { reason } => {
                write!(f, "Invalid file format: {reason}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidWorkOrderStatus { status } => ApiError::InvalidInput {
            field: String::from("workOrderStatus"),
            message: format!("Unknown work-order status '{status}'"),
        },
        DomainError::InvalidDisplayStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown status filter '{status}'"),
        },
        DomainError::InvalidJobStatus { status } => ApiError::InvalidInput {
            field: String::from("jobStatus"),
            message: format!("Unknown job status '{status}'"),
        },
        DomainError::InvalidStatusTransition { from, to, allowed } => {
            ApiError::DomainRuleViolation {
                rule: String::from("status_transition"),
                message: format!(
                    "Cannot transition from '{from}' to '{to}'; allowed next statuses: [{}]",
                    allowed.join(", ")
                ),
            }
        }
        DomainError::RemarksRequired { entering } => ApiError::DomainRuleViolation {
            rule: String::from("remarks_required"),
            message: format!("Entering '{entering}' requires non-empty remarks"),
        },
        DomainError::InvalidField { field, reason } => ApiError::InvalidInput {
            field,
            message: reason,
        },
        DomainError::InvalidWorkOrderNumber { number } => ApiError::InvalidInput {
            field: String::from("workOrderNumber"),
            message: format!("Invalid work-order number '{number}'"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Uniqueness violations surface as conflicts; unknown rows as not-found.
/// Everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(message) => ApiError::Conflict { message },
        PersistenceError::WorkOrderNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Work order"),
            message: format!("Work order {id} not found"),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
