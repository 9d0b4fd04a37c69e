// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk import pipeline.
//!
//! The pipeline has a pure preparation phase and a store-bound execution
//! phase:
//!
//! 1. `ImportPlan::prepare` parses the uploaded file (CSV or spreadsheet),
//!    matches headers against the shared column map, normalizes every row
//!    independently, and decides each row's disposition. An unreadable file
//!    is the only top-level failure; everything after that is row-scoped.
//! 2. `execute_import_batch` creates the records of one batch against the
//!    store, recording per-row errors and progress counters.
//!
//! The caller drives batches sequentially and checks for cancellation at
//! batch boundaries, so progress reporting stays deterministic and the
//! report is queryable mid-flight.

use crate::error::ApiError;
use crate::mapping::{ColumnKind, ColumnSpec, match_header};
use crate::request_response::{ImportReport, RowIssue, SkippedRow};
use crate::AuthenticatedAgent;
use calamine::{Data, Reader, Xlsx};
use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use fieldwork_domain::{
    AreaCode, JobStatus, WorkOrder, WorkOrderStatus, parse_flexible_date,
    validate_work_order_fields,
};
use fieldwork_persistence::{Persistence, PersistenceError};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Rows are created in sequential batches of this size.
pub const BATCH_SIZE: usize = 10;

/// A row must populate at least this many mapped source fields to be
/// imported. Rows below the threshold are skipped, not failed.
const MIN_POPULATED_FIELDS: usize = 3;

/// Normalized field values of one importable row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFields {
    /// Explicit number from the file, if any; generated otherwise.
    pub work_order_number: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub work_order_type: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub area: String,
    pub area_code: String,
    pub supervisor: String,
    pub technician: String,
    pub description: String,
    pub hours: Option<f64>,
    pub work_order_status: WorkOrderStatus,
    pub job_status: JobStatus,
    pub distribution: String,
    pub completion_date: Option<String>,
    pub reschedule_date: Option<NaiveDate>,
    pub remarks: String,
    /// From the agent-name column; the acting identity otherwise.
    pub agent_name: Option<String>,
}

/// The decided fate of one data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowDisposition {
    /// The row is too sparse to import.
    Skip {
        /// 1-based data-row number.
        row: usize,
        /// Why the row was skipped.
        reason: String,
    },
    /// The row will be created.
    Create {
        /// 1-based data-row number.
        row: usize,
        /// Normalized field values.
        fields: Box<RowFields>,
        /// Warnings gathered during normalization.
        warnings: Vec<RowIssue>,
    },
}

/// A prepared import: every row parsed, mapped, and normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    /// Total data rows in the file.
    pub total: usize,
    /// Per-row dispositions, in file order.
    pub rows: Vec<RowDisposition>,
}

impl ImportPlan {
    /// Parses and normalizes an uploaded tabular file.
    ///
    /// The format is chosen by file extension: `.csv` is parsed as CSV,
    /// `.xlsx` as a spreadsheet (first worksheet). The first row must be the
    /// header row; headers that match no column are ignored.
    ///
    /// `today` anchors relative date keywords so preparation stays pure.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidFileFormat` if the file cannot be read as
    /// tabular data or no header matches the column map. Row-level problems
    /// never fail preparation.
    pub fn prepare(file_name: &str, bytes: &[u8], today: NaiveDate) -> Result<Self, ApiError> {
        let grid: Vec<Vec<String>> = parse_tabular(file_name, bytes)?;

        let Some((header, data_rows)) = grid.split_first() else {
            return Err(ApiError::InvalidFileFormat {
                reason: String::from("File contains no rows"),
            });
        };

        let mut columns: HashMap<usize, &'static ColumnSpec> = HashMap::new();
        for (idx, raw) in header.iter().enumerate() {
            if let Some(spec) = match_header(raw) {
                columns.insert(idx, spec);
            } else if !raw.trim().is_empty() {
                tracing::debug!("Ignoring unrecognized column header '{}'", raw.trim());
            }
        }
        if columns.is_empty() {
            return Err(ApiError::InvalidFileFormat {
                reason: String::from("No recognized column headers"),
            });
        }

        let rows: Vec<RowDisposition> = data_rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| normalize_row(idx + 1, cells, &columns, today))
            .collect();

        Ok(Self {
            total: rows.len(),
            rows,
        })
    }

    /// The sequential batches to execute, in file order.
    #[must_use]
    pub fn batches(&self) -> std::slice::Chunks<'_, RowDisposition> {
        self.rows.chunks(BATCH_SIZE)
    }
}

/// Reads the raw cell grid out of a CSV or spreadsheet file.
fn parse_tabular(file_name: &str, bytes: &[u8]) -> Result<Vec<Vec<String>>, ApiError> {
    let lower: String = file_name.to_lowercase();
    if lower.ends_with(".csv") {
        parse_csv(bytes)
    } else if lower.ends_with(".xlsx") {
        parse_xlsx(bytes)
    } else {
        Err(ApiError::InvalidFileFormat {
            reason: format!("Unsupported file type: '{file_name}' (expected .csv or .xlsx)"),
        })
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ApiError::InvalidFileFormat {
            reason: format!("CSV parse error: {e}"),
        })?;
        grid.push(record.iter().map(ToString::to_string).collect());
    }
    Ok(grid)
}

fn parse_xlsx(bytes: &[u8]) -> Result<Vec<Vec<String>>, ApiError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(|e| ApiError::InvalidFileFormat {
            reason: format!("Spreadsheet parse error: {e}"),
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ApiError::InvalidFileFormat {
            reason: String::from("Spreadsheet contains no worksheets"),
        })?
        .map_err(|e| ApiError::InvalidFileFormat {
            reason: format!("Spreadsheet parse error: {e}"),
        })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Renders a spreadsheet cell as the text the normalizer works on.
///
/// Date-typed cells keep their serial value; the flexible date parser
/// understands those.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => render_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => render_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

fn render_number(f: f64) -> String {
    if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// A cell value after kind-driven normalization.
///
/// The variant is decided by the column's `ColumnKind`, so a column's
/// treatment is defined once in the mapping table. Date and number variants
/// hold `None` when the cell failed to parse.
#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Text(String),
    Date(Option<NaiveDate>),
    Number(Option<f64>),
}

/// Normalizes one data row into its disposition.
///
/// Pure per-row logic: no store access, no cross-row state. Each populated
/// cell is normalized according to its column's kind; date and number cells
/// that fail to parse become null plus a row-scoped warning, never an error.
/// The sparse-row check counts populated source cells before any defaulting.
fn normalize_row(
    row: usize,
    cells: &[String],
    columns: &HashMap<usize, &'static ColumnSpec>,
    today: NaiveDate,
) -> RowDisposition {
    let mut raw_values: HashMap<&'static str, (&'static ColumnSpec, &str)> = HashMap::new();
    for (idx, &spec) in columns {
        let cell: &str = cells.get(*idx).map_or("", |c| c.trim());
        if !cell.is_empty() {
            raw_values.insert(spec.field, (spec, cell));
        }
    }

    let populated: usize = raw_values.len();
    if populated < MIN_POPULATED_FIELDS {
        return RowDisposition::Skip {
            row,
            reason: format!(
                "Only {populated} of the mapped fields are populated (minimum {MIN_POPULATED_FIELDS})"
            ),
        };
    }

    let mut warnings: Vec<RowIssue> = Vec::new();
    let mut normalized: HashMap<&'static str, CellValue> = HashMap::new();
    for (&field, &(spec, raw)) in &raw_values {
        let value: CellValue = match spec.kind {
            ColumnKind::Text => CellValue::Text(raw.to_string()),
            ColumnKind::Date => {
                let parsed: Option<NaiveDate> = parse_flexible_date(raw, today);
                if parsed.is_none() {
                    warnings.push(RowIssue {
                        row,
                        column: Some(field.to_string()),
                        message: format!("Unparseable date '{raw}'"),
                    });
                }
                CellValue::Date(parsed)
            }
            ColumnKind::Number => {
                let parsed: Option<f64> = raw.parse().ok();
                if parsed.is_none() {
                    warnings.push(RowIssue {
                        row,
                        column: Some(field.to_string()),
                        message: format!("Unparseable number '{raw}'"),
                    });
                }
                CellValue::Number(parsed)
            }
        };
        normalized.insert(field, value);
    }

    let mut warn = |column: &str, message: String| {
        warnings.push(RowIssue {
            row,
            column: Some(column.to_string()),
            message,
        });
    };

    let text = |field: &str| -> String {
        match normalized.get(field) {
            Some(CellValue::Text(s)) => s.clone(),
            _ => String::new(),
        }
    };
    let text_opt = |field: &str| -> Option<String> {
        match normalized.get(field) {
            Some(CellValue::Text(s)) => Some(s.clone()),
            _ => None,
        }
    };
    let date = |field: &str| -> Option<NaiveDate> {
        match normalized.get(field) {
            Some(CellValue::Date(d)) => *d,
            _ => None,
        }
    };
    let number = |field: &str| -> Option<f64> {
        match normalized.get(field) {
            Some(CellValue::Number(n)) => *n,
            _ => None,
        }
    };

    let raw_status: String = text("workOrderStatus");
    let work_order_status: WorkOrderStatus = if raw_status.is_empty() {
        WorkOrderStatus::Pending
    } else {
        raw_status.parse().unwrap_or_else(|_| {
            warn(
                "workOrderStatus",
                format!("Unknown status '{raw_status}', defaulting to Pending"),
            );
            WorkOrderStatus::Pending
        })
    };

    let raw_job_status: String = text("jobStatus");
    let job_status: JobStatus = if raw_job_status.is_empty() {
        JobStatus::NotAttend
    } else {
        raw_job_status.parse().unwrap_or_else(|_| {
            warn(
                "jobStatus",
                format!("Unknown job status '{raw_job_status}', defaulting to Not Attend"),
            );
            JobStatus::NotAttend
        })
    };

    let fields = RowFields {
        work_order_number: text_opt("workOrderNumber"),
        visit_date: date("visitDate"),
        work_order_type: text("workOrderType"),
        customer_name: text("customerName"),
        customer_phone: text("customerPhone"),
        area: text("area"),
        area_code: text("areaCode"),
        supervisor: text("supervisor"),
        technician: text("technician"),
        description: text("description"),
        hours: number("hours"),
        work_order_status,
        job_status,
        distribution: text("distribution"),
        completion_date: date("completionDate")
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true)),
        reschedule_date: date("rescheduleDate"),
        remarks: text("remarks"),
        agent_name: text_opt("agentName"),
    };

    RowDisposition::Create {
        row,
        fields: Box::new(fields),
        warnings,
    }
}

/// Shared, live progress of a running import.
///
/// Counters update per row, so a snapshot taken mid-flight reflects exactly
/// the rows consumed so far. Cancellation is cooperative: the batch driver
/// checks the flag at batch boundaries.
#[derive(Debug)]
pub struct ImportProgress {
    total: usize,
    processed: AtomicUsize,
    success: AtomicUsize,
    cancelled: AtomicBool,
    finished: AtomicBool,
    issues: Mutex<IssueLists>,
}

#[derive(Debug, Default)]
struct IssueLists {
    errors: Vec<RowIssue>,
    warnings: Vec<RowIssue>,
    skipped: Vec<SkippedRow>,
}

impl ImportProgress {
    /// Creates progress tracking for a plan of `total` rows.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            success: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            issues: Mutex::new(IssueLists::default()),
        }
    }

    /// Requests cooperative cancellation.
    ///
    /// The batch in flight still completes; no further batch starts.
    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Marks the import as finished (completed or cancelled).
    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Takes a consistent point-in-time report.
    ///
    /// # Panics
    ///
    /// Panics if the internal issue lock is poisoned, which only happens
    /// after a panic while recording an issue.
    #[must_use]
    pub fn snapshot(&self) -> ImportReport {
        let issues = self.issues.lock().unwrap();
        ImportReport {
            total: self.total,
            processed: self.processed.load(Ordering::SeqCst),
            success_count: self.success.load(Ordering::SeqCst),
            errors: issues.errors.clone(),
            warnings: issues.warnings.clone(),
            skipped: issues.skipped.clone(),
            cancelled: self.is_cancelled(),
            finished: self.finished.load(Ordering::SeqCst),
        }
    }

    fn record_row(&self, success: bool) {
        if success {
            self.success.fetch_add(1, Ordering::SeqCst);
        }
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    fn with_issues(&self, f: impl FnOnce(&mut IssueLists)) {
        let mut issues = self.issues.lock().unwrap();
        f(&mut issues);
    }
}

/// Executes one batch of a prepared import against the store.
///
/// Every row in the batch is consumed exactly once: skipped rows are
/// recorded as skipped, failed rows as row-scoped errors, and created rows
/// increment the success counter. A store failure on one row never aborts
/// the rest of the batch.
pub fn execute_import_batch(
    persistence: &mut Persistence,
    batch: &[RowDisposition],
    agent: &AuthenticatedAgent,
    progress: &ImportProgress,
) {
    for disposition in batch {
        match disposition {
            RowDisposition::Skip { row, reason } => {
                progress.with_issues(|issues| {
                    issues.skipped.push(SkippedRow {
                        row: *row,
                        reason: reason.clone(),
                    });
                });
                progress.record_row(false);
            }
            RowDisposition::Create {
                row,
                fields,
                warnings,
            } => {
                progress.with_issues(|issues| {
                    issues.warnings.extend(warnings.iter().cloned());
                });
                let success: bool = match create_row(persistence, fields, agent) {
                    Ok(()) => true,
                    Err(message) => {
                        progress.with_issues(|issues| {
                            issues.errors.push(RowIssue {
                                row: *row,
                                column: None,
                                message,
                            });
                        });
                        false
                    }
                };
                progress.record_row(success);
            }
        }
    }
}

/// Creates one row's work order. Returns a row-scoped error message on
/// failure.
fn create_row(
    persistence: &mut Persistence,
    fields: &RowFields,
    agent: &AuthenticatedAgent,
) -> Result<(), String> {
    let number: String = match &fields.work_order_number {
        Some(explicit) => explicit.clone(),
        None => persistence
            .generate_work_order_number(Local::now())
            .map_err(|e| format!("Failed to generate work-order number: {e}"))?,
    };

    let now: String = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let created_by: String = fields
        .agent_name
        .clone()
        .unwrap_or_else(|| agent.display_name.clone());

    let completion_date: Option<String> = match (&fields.completion_date, fields.work_order_status)
    {
        (None, WorkOrderStatus::Completed) => Some(now.clone()),
        (explicit, _) => explicit.clone(),
    };

    let order = WorkOrder {
        id: None,
        work_order_number: number,
        visit_date: fields.visit_date,
        work_order_type: fields.work_order_type.clone(),
        customer_name: fields.customer_name.clone(),
        customer_phone: fields.customer_phone.clone(),
        area: fields.area.clone(),
        area_code: AreaCode::new(&fields.area_code),
        supervisor: fields.supervisor.clone(),
        technician: fields.technician.clone(),
        description: fields.description.clone(),
        hours: fields.hours,
        work_order_status: fields.work_order_status,
        job_status: fields.job_status,
        distribution: fields.distribution.clone(),
        completion_date,
        reschedule_date: fields.reschedule_date,
        remarks: fields.remarks.clone(),
        created_by: created_by.clone(),
        updated_by: created_by,
        created_at: now.clone(),
        updated_at: now,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
        attachments: Vec::new(),
    };

    if let Err(violations) = validate_work_order_fields(&order) {
        let detail: Vec<String> = violations.iter().map(ToString::to_string).collect();
        return Err(format!("Validation failed: {}", detail.join("; ")));
    }

    persistence.create_work_order(&order).map_err(|e| match e {
        PersistenceError::UniqueViolation(_) => format!(
            "Duplicate work-order number '{}'",
            order.work_order_number
        ),
        other => format!("Store error: {other}"),
    })?;
    Ok(())
}
