// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work-order mutation operations.
//!
//! Records are never hard-deleted through these functions: deletion sets the
//! soft-delete triple and leaves the row in place.

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewAttachmentRow, NewWorkOrderRow, WorkOrderChangeset};
use crate::diesel_schema::{attachments, work_orders};
use crate::error::PersistenceError;
use diesel::prelude::*;

/// Inserts a new work-order row and returns its assigned ID.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the work-order number is
/// already taken, or another error if the insert fails.
pub fn insert_work_order(
    conn: &mut SqliteConnection,
    row: &NewWorkOrderRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(work_orders::table)
        .values(row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Applies a full update to a work-order row.
///
/// # Errors
///
/// Returns `PersistenceError::WorkOrderNotFound` if no non-deleted row with
/// the given ID exists.
pub fn update_work_order(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &WorkOrderChangeset,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        work_orders::table
            .filter(work_orders::id.eq(id))
            .filter(work_orders::is_deleted.eq(0)),
    )
    .set(changes)
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::WorkOrderNotFound(id.to_string()));
    }
    Ok(())
}

/// Soft-deletes a work-order row.
///
/// Sets the soft-delete triple and stamps the audit fields. Idempotent
/// deletion of an already-deleted row reports not-found, matching the read
/// paths which no longer see it.
///
/// # Errors
///
/// Returns `PersistenceError::WorkOrderNotFound` if no non-deleted row with
/// the given ID exists.
pub fn soft_delete_work_order(
    conn: &mut SqliteConnection,
    id: i64,
    deleted_by: &str,
    deleted_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        work_orders::table
            .filter(work_orders::id.eq(id))
            .filter(work_orders::is_deleted.eq(0)),
    )
    .set((
        work_orders::is_deleted.eq(1),
        work_orders::deleted_at.eq(Some(deleted_at.to_string())),
        work_orders::deleted_by.eq(Some(deleted_by.to_string())),
        work_orders::updated_at.eq(deleted_at.to_string()),
        work_orders::updated_by.eq(deleted_by.to_string()),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::WorkOrderNotFound(id.to_string()));
    }
    Ok(())
}

/// Inserts an attachment row and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including a foreign-key failure
/// when the work order does not exist.
pub fn insert_attachment(
    conn: &mut SqliteConnection,
    row: &NewAttachmentRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(attachments::table)
        .values(row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
