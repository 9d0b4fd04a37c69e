// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work-order status tracking and transition logic.
//!
//! This module defines the canonical lifecycle states and valid transitions.
//! A separate, wider display vocabulary exists for list/detail filtering and
//! is deliberately not governed by the state machine.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canonical work-order lifecycle states.
///
/// These are the only states the transition validator reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    /// Created but not yet started.
    Pending,
    /// A technician is actively working the order.
    InProgress,
    /// Work paused; requires remarks explaining why.
    OnHold,
    /// Visit moved to a new date; requires remarks.
    Rescheduled,
    /// Work finished. Terminal.
    Completed,
    /// Order abandoned. Terminal.
    Cancelled,
}

impl WorkOrderStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::Rescheduled => "Rescheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "Pending" => Ok(Self::Pending),
            "In Progress" => Ok(Self::InProgress),
            "On Hold" => Ok(Self::OnHold),
            "Rescheduled" => Ok(Self::Rescheduled),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidWorkOrderStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (no outgoing transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns the statuses that may legally follow this one.
    ///
    /// Self-transitions are handled separately as idempotent no-ops and are
    /// never listed here.
    #[must_use]
    pub const fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress, Self::Cancelled, Self::Rescheduled],
            Self::InProgress => &[
                Self::Completed,
                Self::OnHold,
                Self::Cancelled,
                Self::Rescheduled,
            ],
            Self::OnHold => &[Self::InProgress, Self::Cancelled, Self::Rescheduled],
            Self::Rescheduled => &[Self::Pending, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    /// Returns true if entering this status requires non-empty remarks.
    ///
    /// This is a precondition enforced by the API layer, not by the state
    /// machine itself.
    #[must_use]
    pub const fn requires_remarks(&self) -> bool {
        matches!(self, Self::Rescheduled | Self::OnHold)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Re-submitting the current status is an idempotent no-op and is always
    /// allowed without consulting the transition table.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` carrying the legal next
    /// statuses if the transition is not allowed.
    pub fn validate_transition(&self, requested: Self) -> Result<(), DomainError> {
        if *self == requested {
            return Ok(());
        }

        if self.allowed_transitions().contains(&requested) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: requested.as_str().to_string(),
                allowed: self
                    .allowed_transitions()
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            })
        }
    }

    /// All canonical statuses, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::InProgress,
            Self::OnHold,
            Self::Rescheduled,
            Self::Completed,
            Self::Cancelled,
        ]
    }
}

impl FromStr for WorkOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The display-status vocabulary accepted by list/detail filter validation.
///
/// This is a superset of the canonical transition states. Historical records
/// and UI filters use labels that were never lifecycle states, so the two
/// vocabularies are kept as parallel enumerations rather than unified.
pub const DISPLAY_STATUSES: &[&str] = &[
    "Pending",
    "In Progress",
    "On Hold",
    "Rescheduled",
    "Completed",
    "Cancelled",
    "Open",
    "Closed",
    "Awaiting Approval",
    "No Access",
];

/// Validates a display-status filter value against the display vocabulary.
///
/// # Errors
///
/// Returns `DomainError::InvalidDisplayStatus` if the value is not in the
/// display vocabulary.
pub fn validate_display_status(s: &str) -> Result<(), DomainError> {
    if DISPLAY_STATUSES.contains(&s) {
        Ok(())
    } else {
        Err(DomainError::InvalidDisplayStatus {
            status: s.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in WorkOrderStatus::all() {
            let s = status.as_str();
            match WorkOrderStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(*status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        assert!(WorkOrderStatus::parse_str("Finished").is_err());
        assert!(WorkOrderStatus::parse_str("pending").is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!WorkOrderStatus::Pending.is_terminal());
        assert!(!WorkOrderStatus::InProgress.is_terminal());
        assert!(!WorkOrderStatus::OnHold.is_terminal());
        assert!(!WorkOrderStatus::Rescheduled.is_terminal());
        assert!(WorkOrderStatus::Completed.is_terminal());
        assert!(WorkOrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_self_transition_is_idempotent() {
        for status in WorkOrderStatus::all() {
            assert!(
                status.validate_transition(*status).is_ok(),
                "self-transition from {status} should be allowed"
            );
        }
    }

    #[test]
    fn test_all_pairs_against_transition_table() {
        for from in WorkOrderStatus::all() {
            for to in WorkOrderStatus::all() {
                let expected = *from == *to || from.allowed_transitions().contains(to);
                assert_eq!(
                    from.validate_transition(*to).is_ok(),
                    expected,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_illegal_transition_reports_allowed_set() {
        let err = WorkOrderStatus::Pending
            .validate_transition(WorkOrderStatus::Completed)
            .unwrap_err();
        match err {
            DomainError::InvalidStatusTransition { from, to, allowed } => {
                assert_eq!(from, "Pending");
                assert_eq!(to, "Completed");
                assert_eq!(allowed, vec!["In Progress", "Cancelled", "Rescheduled"]);
            }
            other => panic!("Expected InvalidStatusTransition, got {other}"),
        }
    }

    #[test]
    fn test_no_transitions_from_terminal_states() {
        for terminal in [WorkOrderStatus::Completed, WorkOrderStatus::Cancelled] {
            for to in WorkOrderStatus::all() {
                if *to == terminal {
                    continue;
                }
                assert!(terminal.validate_transition(*to).is_err());
            }
        }
    }

    #[test]
    fn test_remarks_precondition_states() {
        assert!(WorkOrderStatus::Rescheduled.requires_remarks());
        assert!(WorkOrderStatus::OnHold.requires_remarks());
        assert!(!WorkOrderStatus::Completed.requires_remarks());
        assert!(!WorkOrderStatus::Pending.requires_remarks());
    }

    #[test]
    fn test_display_vocabulary_covers_canonical_states() {
        for status in WorkOrderStatus::all() {
            assert!(validate_display_status(status.as_str()).is_ok());
        }
        assert!(validate_display_status("Open").is_ok());
        assert!(validate_display_status("Wontfix").is_err());
    }
}
