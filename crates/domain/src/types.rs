// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a normalized area code.
///
/// Area codes are normalized to uppercase so that lookups and the uniqueness
/// of filter matches are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaCode {
    /// The area code value (uppercase).
    value: String,
}

impl AreaCode {
    /// Creates a new `AreaCode`.
    ///
    /// The value is trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_uppercase(),
        }
    }

    /// Returns the area code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if the code is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Display for AreaCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Whether the customer site visit was attended.
///
/// This is tracked independently of the lifecycle status: a visit can be
/// attended without the order completing, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// The technician attended the site.
    Attend,
    /// The technician did not attend the site.
    NotAttend,
}

impl JobStatus {
    /// Returns the string representation of the job status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attend => "Attend",
            Self::NotAttend => "Not Attend",
        }
    }

    /// Parses a job status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "Attend" => Ok(Self::Attend),
            "Not Attend" => Ok(Self::NotAttend),
            _ => Err(DomainError::InvalidJobStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file attached to a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// The attachment URL.
    pub url: String,
    /// The original filename.
    pub filename: String,
    /// Upload timestamp (RFC 3339 UTC).
    pub uploaded_at: String,
    /// Display name of the uploader.
    pub uploaded_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_code_normalization() {
        let code = AreaCode::new("  zn-04 ");
        assert_eq!(code.value(), "ZN-04");
        assert!(!code.is_empty());
        assert!(AreaCode::new("   ").is_empty());
    }

    #[test]
    fn test_job_status_round_trip() {
        for status in [JobStatus::Attend, JobStatus::NotAttend] {
            assert_eq!(JobStatus::parse_str(status.as_str()), Ok(status));
        }
        assert!(JobStatus::parse_str("Attended").is_err());
    }
}
