// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filter builder tests.

use crate::tests::sample_work_order;
use crate::{Persistence, WorkOrderFilter};
use fieldwork_domain::{AreaCode, JobStatus, WorkOrderStatus};

/// Seeds three orders with distinct fields and creation times.
fn seeded() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let mut first = sample_work_order("WO202506100001", "2025-06-10T08:00:00Z");
    first.work_order_type = String::from("Installation");
    first.customer_name = String::from("Acme Utilities");
    first.area = String::from("North Ridge");
    first.area_code = AreaCode::new("nr-01");
    first.supervisor = String::from("Sam Rivera");
    first.visit_date = Some("2025-06-10".parse().unwrap());
    persistence.create_work_order(&first).unwrap();

    let mut second = sample_work_order("WO202506110001", "2025-06-11T08:00:00Z");
    second.work_order_type = String::from("Maintenance");
    second.customer_name = String::from("Borealis Power");
    second.area = String::from("South Bank");
    second.area_code = AreaCode::new("SB-02");
    second.technician = String::from("Lee Park");
    second.work_order_status = WorkOrderStatus::InProgress;
    second.job_status = JobStatus::Attend;
    second.visit_date = Some("2025-06-15".parse().unwrap());
    second.description = String::from("Inspect transformer");
    persistence.create_work_order(&second).unwrap();

    let mut third = sample_work_order("WO202506120001", "2025-06-12T08:00:00Z");
    third.work_order_type = String::from("Maintenance");
    third.customer_name = String::from("Cormorant Water");
    third.area = String::from("North Basin");
    third.area_code = AreaCode::new("NB-03");
    third.distribution = String::from("West");
    third.visit_date = Some("2025-06-20".parse().unwrap());
    persistence.create_work_order(&third).unwrap();

    persistence
}

fn numbers(persistence: &mut Persistence, filter: &WorkOrderFilter) -> Vec<String> {
    persistence
        .list_work_orders(filter)
        .unwrap()
        .into_iter()
        .map(|o| o.work_order_number)
        .collect()
}

#[test]
fn test_default_filter_lists_all_newest_first() {
    let mut persistence = seeded();
    assert_eq!(
        numbers(&mut persistence, &WorkOrderFilter::default()),
        vec!["WO202506120001", "WO202506110001", "WO202506100001"]
    );
}

#[test]
fn test_status_exact_match() {
    let mut persistence = seeded();
    let filter = WorkOrderFilter {
        status: Some(String::from("In Progress")),
        ..WorkOrderFilter::default()
    };
    assert_eq!(numbers(&mut persistence, &filter), vec!["WO202506110001"]);
}

#[test]
fn test_area_substring_is_case_insensitive() {
    let mut persistence = seeded();
    let filter = WorkOrderFilter {
        area_contains: Some(String::from("north")),
        ..WorkOrderFilter::default()
    };
    assert_eq!(
        numbers(&mut persistence, &filter),
        vec!["WO202506120001", "WO202506100001"]
    );
}

#[test]
fn test_area_code_exact_match_after_normalization() {
    let mut persistence = seeded();
    // Stored codes are uppercase even when created lowercase.
    let filter = WorkOrderFilter {
        area_code: Some(String::from("NR-01")),
        ..WorkOrderFilter::default()
    };
    assert_eq!(numbers(&mut persistence, &filter), vec!["WO202506100001"]);
}

#[test]
fn test_visit_date_range_is_inclusive() {
    let mut persistence = seeded();
    let filter = WorkOrderFilter {
        visit_date_from: Some("2025-06-15".parse().unwrap()),
        visit_date_to: Some("2025-06-20".parse().unwrap()),
        ..WorkOrderFilter::default()
    };
    assert_eq!(
        numbers(&mut persistence, &filter),
        vec!["WO202506120001", "WO202506110001"]
    );
}

#[test]
fn test_free_text_search_ors_across_fields() {
    let mut persistence = seeded();

    // Customer name match.
    let filter = WorkOrderFilter {
        search: Some(String::from("Borealis")),
        ..WorkOrderFilter::default()
    };
    assert_eq!(numbers(&mut persistence, &filter), vec!["WO202506110001"]);

    // Description match.
    let filter = WorkOrderFilter {
        search: Some(String::from("transformer")),
        ..WorkOrderFilter::default()
    };
    assert_eq!(numbers(&mut persistence, &filter), vec!["WO202506110001"]);

    // Work-order number match.
    let filter = WorkOrderFilter {
        search: Some(String::from("20250612")),
        ..WorkOrderFilter::default()
    };
    assert_eq!(numbers(&mut persistence, &filter), vec!["WO202506120001"]);
}

#[test]
fn test_filters_combine_with_and() {
    let mut persistence = seeded();
    let filter = WorkOrderFilter {
        work_order_type: Some(String::from("Maintenance")),
        area_contains: Some(String::from("North")),
        ..WorkOrderFilter::default()
    };
    assert_eq!(numbers(&mut persistence, &filter), vec!["WO202506120001"]);
}

#[test]
fn test_pagination_and_count() {
    let mut persistence = seeded();
    let filter = WorkOrderFilter {
        limit: Some(1),
        offset: Some(1),
        ..WorkOrderFilter::default()
    };
    assert_eq!(numbers(&mut persistence, &filter), vec!["WO202506110001"]);

    // Count ignores pagination.
    assert_eq!(persistence.count_work_orders(&filter).unwrap(), 3);
}

#[test]
fn test_deleted_records_are_always_excluded() {
    let mut persistence = seeded();
    let id = persistence
        .get_work_order_by_number("WO202506110001")
        .unwrap()
        .unwrap()
        .id
        .unwrap();
    persistence
        .soft_delete_work_order(id, "test-admin", "2025-06-13T00:00:00Z")
        .unwrap();

    assert_eq!(
        numbers(&mut persistence, &WorkOrderFilter::default()),
        vec!["WO202506120001", "WO202506100001"]
    );
    let filter = WorkOrderFilter {
        status: Some(String::from("In Progress")),
        ..WorkOrderFilter::default()
    };
    assert!(numbers(&mut persistence, &filter).is_empty());
}
