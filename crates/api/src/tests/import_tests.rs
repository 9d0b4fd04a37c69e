// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk import pipeline tests.

use crate::error::ApiError;
use crate::export::{export_csv, export_xlsx};
use crate::handlers::{create_work_order, fetch_all_for_export};
use crate::import::{ImportPlan, ImportProgress, RowDisposition, execute_import_batch};
use crate::request_response::{CreateWorkOrderRequest, ListWorkOrdersRequest};
use crate::tests::helpers::{agent, create_request, persistence, run_import};
use chrono::{Local, NaiveDate};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn fixed_today() -> NaiveDate {
    "2025-06-15".parse().unwrap()
}

#[test]
fn test_unsupported_file_type_is_top_level_error() {
    let result = ImportPlan::prepare("orders.pdf", b"whatever", today());
    assert!(matches!(result, Err(ApiError::InvalidFileFormat { .. })));
}

#[test]
fn test_unrecognized_headers_are_top_level_error() {
    let csv = "Invoice Total,Due Date\n100,2025-01-01\n";
    let result = ImportPlan::prepare("orders.csv", csv.as_bytes(), today());
    assert!(matches!(result, Err(ApiError::InvalidFileFormat { .. })));
}

#[test]
fn test_flexible_dates_and_keywords() {
    let csv = "Customer Name,Visit Date,Description\n\
               Acme,tommorow,Install meter\n\
               Borealis,45658,Inspect line\n";
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();
    assert_eq!(plan.total, 2);

    match &plan.rows[0] {
        RowDisposition::Create { fields, warnings, .. } => {
            assert_eq!(fields.visit_date, Some("2025-06-16".parse().unwrap()));
            assert!(warnings.is_empty());
        }
        other => panic!("Expected Create, got {other:?}"),
    }
    match &plan.rows[1] {
        RowDisposition::Create { fields, .. } => {
            assert_eq!(fields.visit_date, Some("2025-01-01".parse().unwrap()));
        }
        other => panic!("Expected Create, got {other:?}"),
    }
}

#[test]
fn test_legacy_headers_map_to_canonical_fields() {
    let csv = "Client Name,Date of Visit,Zone Code,Notes\n\
               Acme,2025-06-10,nr-01,Check cabling\n";
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();

    match &plan.rows[0] {
        RowDisposition::Create { fields, .. } => {
            assert_eq!(fields.customer_name, "Acme");
            assert_eq!(fields.visit_date, Some("2025-06-10".parse().unwrap()));
            assert_eq!(fields.area_code, "nr-01");
            assert_eq!(fields.remarks, "Check cabling");
        }
        other => panic!("Expected Create, got {other:?}"),
    }
}

#[test]
fn test_cells_normalize_by_column_kind() {
    let csv = "Customer Name,Hours,Rescheduled To,Description\n\
               Acme,not-a-number,tommorow,Install meter\n\
               Borealis,2.5,2025-06-20,Inspect line\n";
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();

    match &plan.rows[0] {
        RowDisposition::Create { fields, warnings, .. } => {
            assert_eq!(fields.hours, None);
            assert_eq!(fields.reschedule_date, Some("2025-06-16".parse().unwrap()));
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].column.as_deref(), Some("hours"));
            assert!(warnings[0].message.contains("not-a-number"));
        }
        other => panic!("Expected Create, got {other:?}"),
    }
    match &plan.rows[1] {
        RowDisposition::Create { fields, warnings, .. } => {
            assert_eq!(fields.hours, Some(2.5));
            assert_eq!(fields.reschedule_date, Some("2025-06-20".parse().unwrap()));
            assert!(warnings.is_empty());
        }
        other => panic!("Expected Create, got {other:?}"),
    }
}

#[test]
fn test_unrecognized_headers_among_recognized_are_ignored() {
    let csv = "Customer Name,Invoice Total,Visit Date,Description\n\
               Acme,9999,2025-06-10,Install meter\n";
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();
    assert_eq!(plan.total, 1);

    match &plan.rows[0] {
        RowDisposition::Create { fields, warnings, .. } => {
            assert_eq!(fields.customer_name, "Acme");
            assert_eq!(fields.visit_date, Some("2025-06-10".parse().unwrap()));
            assert!(warnings.is_empty());
        }
        other => panic!("Expected Create, got {other:?}"),
    }
}

#[test]
fn test_mixed_error_and_warning_accounting() {
    let mut persistence = persistence();

    // Occupy a number so the third row conflicts.
    let taken = CreateWorkOrderRequest {
        work_order_number: Some(String::from("WO202501100009")),
        ..create_request("Existing")
    };
    create_work_order(&mut persistence, &taken, &agent()).unwrap();

    let csv = "Work Order Number,Customer Name,Visit Date,Description\n\
               ,Acme One,2025-01-10,Install meter\n\
               ,Acme Two,someday,Inspect line\n\
               WO202501100009,Acme Three,2025-01-12,Replace pole\n";
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();
    let progress = ImportProgress::new(plan.total);
    run_import(&mut persistence, &plan, &agent(), &progress);

    let report = progress.snapshot();
    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(report.success_count, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 3);
    assert!(report.errors[0].message.contains("WO202501100009"));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].row, 2);
    assert_eq!(report.warnings[0].column.as_deref(), Some("visitDate"));
    assert!(report.skipped.is_empty());
    assert!(report.finished);
    assert!(!report.cancelled);
}

#[test]
fn test_sparse_rows_are_skipped_not_failed() {
    let mut persistence = persistence();

    let csv = "Customer Name,Status,Visit Date,Description\n\
               Acme One,Pending,2025-06-10,Install meter\n\
               Acme Two,Pending,2025-06-11,Inspect line\n\
               Acme Three,Pending,,\n\
               Acme Four,Pending,2025-06-12,Replace pole\n\
               Acme Five,Pending,2025-06-13,Survey site\n";
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();
    let progress = ImportProgress::new(plan.total);
    run_import(&mut persistence, &plan, &agent(), &progress);

    let report = progress.snapshot();
    assert_eq!(report.total, 5);
    assert_eq!(report.processed, 5);
    assert_eq!(report.success_count, 4);
    assert!(report.errors.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 3);
}

#[test]
fn test_cancellation_at_batch_boundary() {
    let mut persistence = persistence();

    let mut csv = String::from("Customer Name,Visit Date,Description\n");
    for i in 0..25 {
        csv.push_str(&format!("Customer {i},2025-06-10,Job {i}\n"));
    }
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();
    let progress = ImportProgress::new(plan.total);

    for (idx, batch) in plan.batches().enumerate() {
        if progress.is_cancelled() {
            break;
        }
        execute_import_batch(&mut persistence, batch, &agent(), &progress);
        if idx == 0 {
            // Cancellation lands while the driver is between batches.
            progress.request_cancel();
        }
    }
    progress.mark_finished();

    let report = progress.snapshot();
    assert_eq!(report.total, 25);
    assert_eq!(report.processed, 10);
    assert_eq!(report.success_count, 10);
    assert!(report.cancelled);
    assert!(report.finished);
}

#[test]
fn test_mid_flight_snapshot_reflects_consumed_rows() {
    let mut persistence = persistence();

    let mut csv = String::from("Customer Name,Visit Date,Description\n");
    for i in 0..15 {
        csv.push_str(&format!("Customer {i},2025-06-10,Job {i}\n"));
    }
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();
    let progress = ImportProgress::new(plan.total);

    let mut batches = plan.batches();
    execute_import_batch(&mut persistence, batches.next().unwrap(), &agent(), &progress);

    let mid = progress.snapshot();
    assert_eq!(mid.total, 15);
    assert_eq!(mid.processed, 10);
    assert!(!mid.finished);

    execute_import_batch(&mut persistence, batches.next().unwrap(), &agent(), &progress);
    progress.mark_finished();
    let done = progress.snapshot();
    assert_eq!(done.processed, 15);
    assert!(done.finished);
}

#[test]
fn test_agent_name_column_overrides_acting_identity() {
    let mut persistence = persistence();

    let csv = "Customer Name,Visit Date,Description,Agent Name\n\
               Acme,2025-06-10,Install meter,Dana Field\n\
               Borealis,2025-06-11,Inspect line,\n";
    let plan = ImportPlan::prepare("orders.csv", csv.as_bytes(), fixed_today()).unwrap();
    let progress = ImportProgress::new(plan.total);
    run_import(&mut persistence, &plan, &agent(), &progress);
    assert_eq!(progress.snapshot().success_count, 2);

    let orders =
        fetch_all_for_export(&mut persistence, &ListWorkOrdersRequest::default(), &agent())
            .unwrap();
    let by_customer = |name: &str| {
        orders
            .iter()
            .find(|o| o.customer_name == name)
            .unwrap()
            .created_by
            .clone()
    };
    assert_eq!(by_customer("Acme"), "Dana Field");
    assert_eq!(by_customer("Borealis"), "Test Agent");
}

#[test]
fn test_csv_export_reimports_cleanly() {
    let mut source = persistence();
    create_work_order(&mut source, &create_request("Acme"), &agent()).unwrap();
    create_work_order(&mut source, &create_request("Borealis"), &agent()).unwrap();

    let orders =
        fetch_all_for_export(&mut source, &ListWorkOrdersRequest::default(), &agent()).unwrap();
    let bytes = export_csv(&orders).unwrap();

    let mut target = persistence();
    let plan = ImportPlan::prepare("orders.csv", &bytes, today()).unwrap();
    let progress = ImportProgress::new(plan.total);
    run_import(&mut target, &plan, &agent(), &progress);

    let report = progress.snapshot();
    assert_eq!(report.success_count, 2);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());

    let reimported =
        fetch_all_for_export(&mut target, &ListWorkOrdersRequest::default(), &agent()).unwrap();
    let acme = reimported
        .iter()
        .find(|o| o.customer_name == "Acme")
        .unwrap();
    assert_eq!(acme.visit_date, Some("2025-01-10".parse().unwrap()));
    assert_eq!(acme.area_code.value(), "NR-01");
    assert_eq!(acme.created_by, "Test Agent");
}

#[test]
fn test_xlsx_export_reimports_cleanly() {
    let mut source = persistence();
    create_work_order(&mut source, &create_request("Acme"), &agent()).unwrap();

    let orders =
        fetch_all_for_export(&mut source, &ListWorkOrdersRequest::default(), &agent()).unwrap();
    let bytes = export_xlsx(&orders).unwrap();

    let plan = ImportPlan::prepare("orders.xlsx", &bytes, today()).unwrap();
    assert_eq!(plan.total, 1);
    match &plan.rows[0] {
        RowDisposition::Create { fields, .. } => {
            assert_eq!(fields.customer_name, "Acme");
            assert_eq!(fields.visit_date, Some("2025-01-10".parse().unwrap()));
        }
        other => panic!("Expected Create, got {other:?}"),
    }
}
