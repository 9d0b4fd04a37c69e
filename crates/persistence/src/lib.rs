// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Fieldwork work-order system.
//!
//! This crate provides database persistence for work orders and their
//! attachments. It is built on Diesel over `SQLite`.
//!
//! ## Backend
//!
//! `SQLite` is the only backend:
//! - File-based databases for deployments (WAL mode, bounded busy timeout)
//! - Unique shared in-memory databases for fast, deterministic tests
//!
//! ## Conventions
//!
//! - Timestamps are RFC 3339 UTC text, dates are ISO `YYYY-MM-DD` text;
//!   both sort lexically so SQL range filters compare strings directly.
//! - Rows are soft-deleted only. Read paths exclude deleted rows; the
//!   uniqueness of work-order numbers spans deleted rows too.

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
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use diesel::SqliteConnection;
use fieldwork_domain::{Attachment, WorkOrder};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

pub use error::PersistenceError;
pub use queries::stats::{WorkOrderStats, compute_stats};
pub use queries::work_orders::WorkOrderFilter;

use data_models::{NewAttachmentRow, NewWorkOrderRow, WorkOrderChangeset, WorkOrderRow};

/// Persistence adapter for work orders and attachments.
///
/// Owns a single `SQLite` connection. Callers that need shared access wrap
/// the adapter in their own synchronization.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Enables WAL mode and a bounded busy timeout so store calls never
    /// block indefinitely on a locked database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    /// * `busy_timeout_ms` - Maximum wait on a locked database before failing
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(
        path: P,
        busy_timeout_ms: u32,
    ) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::set_busy_timeout(&mut conn, busy_timeout_ms)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Numbering
    // ========================================================================

    /// Generates the next work-order number for `now`'s local calendar day.
    ///
    /// The primary shape is `WO<YYYYMMDD><seq>` where `seq` is a 4-digit
    /// zero-padded sequence equal to one plus the count of records created
    /// since local midnight. The count-then-insert is not transactionally
    /// isolated from concurrent creates, so the candidate is checked for a
    /// collision; on collision a hyphenated variant with the next sequence is
    /// returned instead (at most one retry). If that value also collides, the
    /// insert will surface a uniqueness-constraint error to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying queries fail.
    pub fn generate_work_order_number(
        &mut self,
        now: DateTime<Local>,
    ) -> Result<String, PersistenceError> {
        let local_date: NaiveDate = now.date_naive();
        let midnight_utc: String = local_date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
            .map(|dt| {
                dt.with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            })
            .ok_or_else(|| {
                PersistenceError::Other(format!("No local midnight for {local_date}"))
            })?;

        let count: i64 =
            queries::work_orders::count_created_since(&mut self.conn, &midnight_utc)?;
        let seq: i64 = count + 1;
        let day: String = local_date.format("%Y%m%d").to_string();

        let candidate: String = format!("WO{day}{seq:04}");
        if !queries::work_orders::work_order_number_exists(&mut self.conn, &candidate)? {
            return Ok(candidate);
        }

        let retry_seq: i64 = seq + 1;
        Ok(format!("WO-{day}-{retry_seq:04}"))
    }

    // ========================================================================
    // Work orders
    // ========================================================================

    /// Persists a new work order and returns its assigned internal ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the work-order number
    /// is already taken.
    pub fn create_work_order(&mut self, order: &WorkOrder) -> Result<i64, PersistenceError> {
        let row = NewWorkOrderRow::from_domain(order);
        mutations::work_orders::insert_work_order(&mut self.conn, &row)
    }

    /// Retrieves a work order by internal ID, with its attachments.
    ///
    /// Soft-deleted orders are not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn get_work_order(&mut self, id: i64) -> Result<Option<WorkOrder>, PersistenceError> {
        let Some(row) = queries::work_orders::get_work_order_row(&mut self.conn, id)? else {
            return Ok(None);
        };
        self.hydrate(row).map(Some)
    }

    /// Retrieves a work order by its work-order number, with attachments.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn get_work_order_by_number(
        &mut self,
        number: &str,
    ) -> Result<Option<WorkOrder>, PersistenceError> {
        let Some(row) =
            queries::work_orders::get_work_order_row_by_number(&mut self.conn, number)?
        else {
            return Ok(None);
        };
        self.hydrate(row).map(Some)
    }

    /// Lists work orders matching the filter, newest first, with attachments.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row is corrupt.
    pub fn list_work_orders(
        &mut self,
        filter: &WorkOrderFilter,
    ) -> Result<Vec<WorkOrder>, PersistenceError> {
        let rows: Vec<WorkOrderRow> =
            queries::work_orders::list_work_order_rows(&mut self.conn, filter)?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut grouped: HashMap<i64, Vec<Attachment>> = HashMap::new();
        for attachment in queries::work_orders::load_attachments_for(&mut self.conn, &ids)? {
            grouped
                .entry(attachment.work_order_id)
                .or_default()
                .push(attachment.into_domain());
        }

        rows.into_iter()
            .map(|row| {
                let attachments = grouped.remove(&row.id).unwrap_or_default();
                row.into_domain(attachments)
            })
            .collect()
    }

    /// Counts work orders matching the filter, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_work_orders(
        &mut self,
        filter: &WorkOrderFilter,
    ) -> Result<i64, PersistenceError> {
        queries::work_orders::count_work_orders(&mut self.conn, filter)
    }

    /// Returns true if any record, deleted or not, carries the given number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn work_order_number_exists(&mut self, number: &str) -> Result<bool, PersistenceError> {
        queries::work_orders::work_order_number_exists(&mut self.conn, number)
    }

    /// Applies a full update to a work order.
    ///
    /// The number, creator, and creation timestamp are immutable and ignored
    /// on the supplied entity.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkOrderNotFound` if no non-deleted order
    /// with the given ID exists.
    pub fn update_work_order(
        &mut self,
        id: i64,
        order: &WorkOrder,
    ) -> Result<(), PersistenceError> {
        let changes = WorkOrderChangeset::from_domain(order);
        mutations::work_orders::update_work_order(&mut self.conn, id, &changes)
    }

    /// Soft-deletes a work order.
    ///
    /// # Arguments
    ///
    /// * `id` - The internal work-order ID
    /// * `deleted_by` - Display name of the deleting identity
    /// * `deleted_at` - Deletion timestamp (RFC 3339 UTC)
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkOrderNotFound` if no non-deleted order
    /// with the given ID exists.
    pub fn soft_delete_work_order(
        &mut self,
        id: i64,
        deleted_by: &str,
        deleted_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::work_orders::soft_delete_work_order(&mut self.conn, id, deleted_by, deleted_at)
    }

    /// Adds an attachment to a work order and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkOrderNotFound` if no non-deleted order
    /// with the given ID exists.
    pub fn add_attachment(
        &mut self,
        work_order_id: i64,
        attachment: &Attachment,
    ) -> Result<i64, PersistenceError> {
        // FK enforcement would catch a missing row, but a soft-deleted one
        // still exists, so check through the read path.
        if queries::work_orders::get_work_order_row(&mut self.conn, work_order_id)?.is_none() {
            return Err(PersistenceError::WorkOrderNotFound(
                work_order_id.to_string(),
            ));
        }

        let row = NewAttachmentRow {
            work_order_id,
            url: attachment.url.clone(),
            filename: attachment.filename.clone(),
            uploaded_at: attachment.uploaded_at.clone(),
            uploaded_by: attachment.uploaded_by.clone(),
        };
        mutations::work_orders::insert_attachment(&mut self.conn, &row)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Collects statistics over the records matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    pub fn collect_stats(
        &mut self,
        filter: &WorkOrderFilter,
        today: NaiveDate,
    ) -> Result<WorkOrderStats, PersistenceError> {
        queries::stats::collect_work_order_stats(&mut self.conn, filter, today)
    }

    fn hydrate(&mut self, row: WorkOrderRow) -> Result<WorkOrder, PersistenceError> {
        let attachments: Vec<Attachment> =
            queries::work_orders::load_attachments(&mut self.conn, row.id)?
                .into_iter()
                .map(data_models::AttachmentRow::into_domain)
                .collect();
        row.into_domain(attachments)
    }
}
