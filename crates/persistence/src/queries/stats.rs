// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work-order statistics aggregation.
//!
//! Aggregation runs over the filtered, non-deleted record set. Counting per
//! status and type happens in Rust rather than SQL because the duration math
//! on text-encoded dates needs Rust anyway, and one pass covers everything.

use crate::data_models::WorkOrderRow;
use crate::error::PersistenceError;
use crate::queries::work_orders::{WorkOrderFilter, list_work_order_rows};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completed-status string, the terminal success state.
const COMPLETED: &str = "Completed";
/// Cancelled-status string, the terminal failure state.
const CANCELLED: &str = "Cancelled";

/// Aggregated work-order statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderStats {
    /// Total non-deleted records in scope.
    pub total: i64,
    /// Record count per status string.
    pub by_status: BTreeMap<String, i64>,
    /// Record count per work-order type.
    pub by_type: BTreeMap<String, i64>,
    /// Records with a past visit date and a non-terminal status.
    pub overdue_count: i64,
    /// Records in Completed status.
    pub completed_count: i64,
    /// Percentage of records in Completed status, rounded to two decimals,
    /// 0 when the set is empty.
    pub completion_rate: f64,
    /// Mean hours from visit date to completion over Completed records with
    /// both fields present, 0 when that set is empty.
    pub avg_completion_hours: f64,
}

/// Collects statistics over the records matching the filter.
///
/// Pagination fields on the filter are ignored: statistics always cover the
/// whole matching set.
///
/// # Errors
///
/// Returns an error if the underlying query fails.
pub fn collect_work_order_stats(
    conn: &mut SqliteConnection,
    filter: &WorkOrderFilter,
    today: NaiveDate,
) -> Result<WorkOrderStats, PersistenceError> {
    let unpaged = WorkOrderFilter {
        limit: None,
        offset: None,
        ..filter.clone()
    };
    let rows: Vec<WorkOrderRow> = list_work_order_rows(conn, &unpaged)?;
    Ok(compute_stats(&rows, today))
}

/// Pure aggregation over loaded rows.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_stats(rows: &[WorkOrderRow], today: NaiveDate) -> WorkOrderStats {
    let total: i64 = rows.len() as i64;
    let mut by_status: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_type: BTreeMap<String, i64> = BTreeMap::new();
    let mut overdue_count: i64 = 0;
    let mut completed_count: i64 = 0;
    let mut completion_hours_sum: f64 = 0.0;
    let mut completion_hours_count: i64 = 0;

    let today_str: String = today.to_string();

    for row in rows {
        *by_status.entry(row.work_order_status.clone()).or_insert(0) += 1;
        if !row.work_order_type.is_empty() {
            *by_type.entry(row.work_order_type.clone()).or_insert(0) += 1;
        }

        let terminal: bool = row.work_order_status == COMPLETED || row.work_order_status == CANCELLED;
        if !terminal
            && row
                .visit_date
                .as_ref()
                .is_some_and(|visit| visit.as_str() < today_str.as_str())
        {
            overdue_count += 1;
        }

        if row.work_order_status == COMPLETED {
            completed_count += 1;
            if let Some(hours) = completion_duration_hours(row) {
                completion_hours_sum += hours;
                completion_hours_count += 1;
            }
        }
    }

    let completion_rate: f64 = if total == 0 {
        0.0
    } else {
        round_two(completed_count as f64 / total as f64 * 100.0)
    };
    let avg_completion_hours: f64 = if completion_hours_count == 0 {
        0.0
    } else {
        completion_hours_sum / completion_hours_count as f64
    };

    WorkOrderStats {
        total,
        by_status,
        by_type,
        overdue_count,
        completed_count,
        completion_rate,
        avg_completion_hours,
    }
}

/// Rounds to two decimal places for the percentage contract.
fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hours from the visit date (taken at UTC midnight) to the completion
/// timestamp. `None` if either field is missing or unparseable.
fn completion_duration_hours(row: &WorkOrderRow) -> Option<f64> {
    let visit: NaiveDate = row.visit_date.as_ref()?.parse().ok()?;
    let completed: DateTime<Utc> = DateTime::parse_from_rfc3339(row.completion_date.as_ref()?)
        .ok()?
        .with_timezone(&Utc);
    let visit_midnight: DateTime<Utc> = visit.and_hms_opt(0, 0, 0)?.and_utc();

    #[allow(clippy::cast_precision_loss)]
    Some((completed - visit_midnight).num_seconds() as f64 / 3600.0)
}
