// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work-order query operations.
//!
//! All read paths exclude soft-deleted rows. The filter builder combines
//! every supplied criterion with AND; the free-text search ORs substring
//! matches across customer name, description, and work-order number.

use crate::data_models::{AttachmentRow, WorkOrderRow};
use crate::diesel_schema::{attachments, work_orders};
use crate::error::PersistenceError;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

/// Filter criteria for listing work orders.
///
/// Each field is independently optional. No field restricts by acting
/// identity: every authenticated caller sees the full record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkOrderFilter {
    /// Exact-match on the stored status string (display vocabulary).
    pub status: Option<String>,
    /// Exact-match on work-order type.
    pub work_order_type: Option<String>,
    /// Exact-match on distribution.
    pub distribution: Option<String>,
    /// Exact-match on supervisor name.
    pub supervisor: Option<String>,
    /// Exact-match on technician name.
    pub technician: Option<String>,
    /// Case-insensitive substring match on area.
    pub area_contains: Option<String>,
    /// Exact match on the uppercase-normalized area code.
    pub area_code: Option<String>,
    /// Inclusive lower bound on visit date.
    pub visit_date_from: Option<NaiveDate>,
    /// Inclusive upper bound on visit date.
    pub visit_date_to: Option<NaiveDate>,
    /// Free-text search across customer name, description, and number.
    pub search: Option<String>,
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
    /// Number of rows to skip.
    pub offset: Option<i64>,
}

/// Builds the filtered base query.
///
/// `is_deleted = 0` is unconditional. `SQLite` `LIKE` is ASCII
/// case-insensitive, which provides the case-insensitive substring semantics
/// for area and free-text search.
fn filtered_query(filter: &WorkOrderFilter) -> work_orders::BoxedQuery<'static, Sqlite> {
    let mut query = work_orders::table
        .filter(work_orders::is_deleted.eq(0))
        .into_boxed();

    if let Some(status) = &filter.status {
        query = query.filter(work_orders::work_order_status.eq(status.clone()));
    }
    if let Some(work_order_type) = &filter.work_order_type {
        query = query.filter(work_orders::work_order_type.eq(work_order_type.clone()));
    }
    if let Some(distribution) = &filter.distribution {
        query = query.filter(work_orders::distribution.eq(distribution.clone()));
    }
    if let Some(supervisor) = &filter.supervisor {
        query = query.filter(work_orders::supervisor.eq(supervisor.clone()));
    }
    if let Some(technician) = &filter.technician {
        query = query.filter(work_orders::technician.eq(technician.clone()));
    }
    if let Some(area) = &filter.area_contains {
        query = query.filter(work_orders::area.like(format!("%{area}%")));
    }
    if let Some(area_code) = &filter.area_code {
        query = query.filter(work_orders::area_code.eq(area_code.clone()));
    }
    if let Some(from) = filter.visit_date_from {
        query = query.filter(work_orders::visit_date.ge(from.to_string()));
    }
    if let Some(to) = filter.visit_date_to {
        query = query.filter(work_orders::visit_date.le(to.to_string()));
    }
    if let Some(term) = &filter.search {
        let pattern: String = format!("%{term}%");
        query = query.filter(
            work_orders::customer_name
                .like(pattern.clone())
                .or(work_orders::description.like(pattern.clone()))
                .or(work_orders::work_order_number.like(pattern)),
        );
    }

    query
}

/// Lists work-order rows matching the filter, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_work_order_rows(
    conn: &mut SqliteConnection,
    filter: &WorkOrderFilter,
) -> Result<Vec<WorkOrderRow>, PersistenceError> {
    let mut query = filtered_query(filter).order(work_orders::created_at.desc());

    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = filter.offset {
        query = query.offset(offset);
    }

    query
        .load::<WorkOrderRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_work_order_rows: {e}")))
}

/// Counts work-order rows matching the filter, ignoring pagination.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_work_orders(
    conn: &mut SqliteConnection,
    filter: &WorkOrderFilter,
) -> Result<i64, PersistenceError> {
    filtered_query(filter)
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_work_orders: {e}")))
}

/// Retrieves a non-deleted work-order row by internal ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_work_order_row(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<WorkOrderRow>, PersistenceError> {
    work_orders::table
        .filter(work_orders::id.eq(id))
        .filter(work_orders::is_deleted.eq(0))
        .first::<WorkOrderRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_work_order_row: {e}")))
}

/// Retrieves a non-deleted work-order row by its work-order number.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_work_order_row_by_number(
    conn: &mut SqliteConnection,
    number: &str,
) -> Result<Option<WorkOrderRow>, PersistenceError> {
    work_orders::table
        .filter(work_orders::work_order_number.eq(number))
        .filter(work_orders::is_deleted.eq(0))
        .first::<WorkOrderRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_work_order_row_by_number: {e}")))
}

/// Returns true if any row (deleted or not) carries the given number.
///
/// Soft-deleted rows keep their number reserved, so uniqueness checks must
/// not filter on `is_deleted`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn work_order_number_exists(
    conn: &mut SqliteConnection,
    number: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = work_orders::table
        .filter(work_orders::work_order_number.eq(number))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("work_order_number_exists: {e}")))?;
    Ok(count > 0)
}

/// Counts rows created at or after the given RFC 3339 UTC cutoff.
///
/// Used by the numbering service for its since-midnight sequence. Deleted
/// rows count too: the sequence reflects creations, not survivors.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_created_since(
    conn: &mut SqliteConnection,
    cutoff: &str,
) -> Result<i64, PersistenceError> {
    work_orders::table
        .filter(work_orders::created_at.ge(cutoff))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_created_since: {e}")))
}

/// Loads the attachments of a single work order, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_attachments(
    conn: &mut SqliteConnection,
    work_order_id: i64,
) -> Result<Vec<AttachmentRow>, PersistenceError> {
    attachments::table
        .filter(attachments::work_order_id.eq(work_order_id))
        .order(attachments::uploaded_at.asc())
        .load::<AttachmentRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_attachments: {e}")))
}

/// Loads the attachments of several work orders in one query.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_attachments_for(
    conn: &mut SqliteConnection,
    work_order_ids: &[i64],
) -> Result<Vec<AttachmentRow>, PersistenceError> {
    attachments::table
        .filter(attachments::work_order_id.eq_any(work_order_ids))
        .order(attachments::uploaded_at.asc())
        .load::<AttachmentRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_attachments_for: {e}")))
}
