// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The shared import/export column mapping.
//!
//! One declarative table drives both sides: import matches incoming headers
//! (current label, legacy labels, or the canonical field name) against it,
//! and export emits columns in its order with its current labels. Changing a
//! column here changes both directions at once.

/// How a column's cell values are normalized on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text, trimmed.
    Text,
    /// Flexible date (keywords, spreadsheet serials, literal formats).
    Date,
    /// Numeric value.
    Number,
}

/// One column in the shared mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Canonical entity field name (camelCase, matching the wire contract).
    pub field: &'static str,
    /// The current human-facing label, used as the export header.
    pub label: &'static str,
    /// Legacy labels still found in historical spreadsheets.
    pub legacy_labels: &'static [&'static str],
    /// Cell normalization kind.
    pub kind: ColumnKind,
}

/// The shared column mapping, in export column order.
pub const COLUMN_MAP: &[ColumnSpec] = &[
    ColumnSpec {
        field: "workOrderNumber",
        label: "Work Order Number",
        legacy_labels: &["WO Number", "WO No", "Order Number"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "visitDate",
        label: "Visit Date",
        legacy_labels: &["Date of Visit", "Scheduled Date"],
        kind: ColumnKind::Date,
    },
    ColumnSpec {
        field: "workOrderType",
        label: "Work Order Type",
        legacy_labels: &["Type", "Order Type"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "customerName",
        label: "Customer Name",
        legacy_labels: &["Customer", "Client Name"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "customerPhone",
        label: "Customer Phone",
        legacy_labels: &["Phone", "Contact Number"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "area",
        label: "Area",
        legacy_labels: &["Zone", "Region"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "areaCode",
        label: "Area Code",
        legacy_labels: &["Zone Code"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "supervisor",
        label: "Supervisor",
        legacy_labels: &["Supervisor Name", "Sup"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "technician",
        label: "Technician",
        legacy_labels: &["Technician Name", "Tech"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "description",
        label: "Description",
        legacy_labels: &["Job Description", "Details"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "hours",
        label: "Hours",
        legacy_labels: &["Hours Worked"],
        kind: ColumnKind::Number,
    },
    ColumnSpec {
        field: "workOrderStatus",
        label: "Status",
        legacy_labels: &["Work Order Status", "WO Status"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "jobStatus",
        label: "Job Status",
        legacy_labels: &["Attendance"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "distribution",
        label: "Distribution",
        legacy_labels: &["Dist"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "completionDate",
        label: "Completion Date",
        legacy_labels: &["Completed On", "Date Completed"],
        kind: ColumnKind::Date,
    },
    ColumnSpec {
        field: "rescheduleDate",
        label: "Reschedule Date",
        legacy_labels: &["Rescheduled To"],
        kind: ColumnKind::Date,
    },
    ColumnSpec {
        field: "remarks",
        label: "Remarks",
        legacy_labels: &["Notes", "Comments"],
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        field: "agentName",
        label: "Agent Name",
        legacy_labels: &["Agent", "Created By"],
        kind: ColumnKind::Text,
    },
];

/// Normalizes a header for matching: trimmed, lowercased, separators removed.
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Matches an incoming header against the column map.
///
/// Accepts the canonical field name, the current label, or any legacy label.
/// Matching ignores case, whitespace, and common separators. Unmatched
/// headers are ignored by the import pipeline, not rejected.
#[must_use]
pub fn match_header(header: &str) -> Option<&'static ColumnSpec> {
    let normalized: String = normalize_header(header);
    if normalized.is_empty() {
        return None;
    }

    COLUMN_MAP.iter().find(|spec| {
        normalize_header(spec.field) == normalized
            || normalize_header(spec.label) == normalized
            || spec
                .legacy_labels
                .iter()
                .any(|legacy| normalize_header(legacy) == normalized)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_current_labels_and_field_names() {
        assert_eq!(match_header("Customer Name").map(|s| s.field), Some("customerName"));
        assert_eq!(match_header("customerName").map(|s| s.field), Some("customerName"));
        assert_eq!(match_header("  visit date ").map(|s| s.field), Some("visitDate"));
    }

    #[test]
    fn test_matches_legacy_labels() {
        assert_eq!(match_header("Client Name").map(|s| s.field), Some("customerName"));
        assert_eq!(match_header("WO Number").map(|s| s.field), Some("workOrderNumber"));
        assert_eq!(match_header("Zone Code").map(|s| s.field), Some("areaCode"));
        assert_eq!(match_header("Rescheduled To").map(|s| s.field), Some("rescheduleDate"));
    }

    #[test]
    fn test_matching_ignores_case_and_separators() {
        assert_eq!(match_header("CUSTOMER_NAME").map(|s| s.field), Some("customerName"));
        assert_eq!(match_header("work-order-type").map(|s| s.field), Some("workOrderType"));
    }

    #[test]
    fn test_unknown_headers_do_not_match() {
        assert!(match_header("Invoice Total").is_none());
        assert!(match_header("").is_none());
    }

    #[test]
    fn test_fields_are_unique() {
        for (i, a) in COLUMN_MAP.iter().enumerate() {
            for b in &COLUMN_MAP[i + 1..] {
                assert_ne!(a.field, b.field);
                assert_ne!(a.label, b.label);
            }
        }
    }
}
