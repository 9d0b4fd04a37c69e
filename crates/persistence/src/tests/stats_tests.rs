// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Statistics aggregation tests.

use crate::tests::sample_work_order;
use crate::{Persistence, WorkOrderFilter};
use chrono::NaiveDate;
use fieldwork_domain::WorkOrderStatus;

fn today() -> NaiveDate {
    "2025-06-15".parse().unwrap()
}

#[test]
fn test_empty_set_has_zero_guards() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let stats = persistence
        .collect_stats(&WorkOrderFilter::default(), today())
        .unwrap();

    assert_eq!(stats.total, 0);
    assert!(stats.by_status.is_empty());
    assert!(stats.by_type.is_empty());
    assert_eq!(stats.overdue_count, 0);
    assert_eq!(stats.completed_count, 0);
    assert!((stats.completion_rate - 0.0).abs() < f64::EPSILON);
    assert!((stats.avg_completion_hours - 0.0).abs() < f64::EPSILON);
}

#[test]
fn test_status_and_type_breakdowns() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let mut first = sample_work_order("WO202506100001", "2025-06-10T08:00:00Z");
    first.work_order_type = String::from("Installation");
    persistence.create_work_order(&first).unwrap();

    let mut second = sample_work_order("WO202506100002", "2025-06-10T09:00:00Z");
    second.work_order_type = String::from("Maintenance");
    second.work_order_status = WorkOrderStatus::InProgress;
    persistence.create_work_order(&second).unwrap();

    let mut third = sample_work_order("WO202506100003", "2025-06-10T10:00:00Z");
    third.work_order_type = String::from("Maintenance");
    persistence.create_work_order(&third).unwrap();

    let stats = persistence
        .collect_stats(&WorkOrderFilter::default(), today())
        .unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_status.get("Pending"), Some(&2));
    assert_eq!(stats.by_status.get("In Progress"), Some(&1));
    assert_eq!(stats.by_type.get("Installation"), Some(&1));
    assert_eq!(stats.by_type.get("Maintenance"), Some(&2));
}

#[test]
fn test_overdue_excludes_terminal_statuses() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    // Past visit, open status: overdue.
    let mut overdue = sample_work_order("WO202506100001", "2025-06-10T08:00:00Z");
    overdue.visit_date = Some("2025-06-10".parse().unwrap());
    persistence.create_work_order(&overdue).unwrap();

    // Past visit, completed: not overdue.
    let mut completed = sample_work_order("WO202506100002", "2025-06-10T09:00:00Z");
    completed.visit_date = Some("2025-06-10".parse().unwrap());
    completed.work_order_status = WorkOrderStatus::Completed;
    completed.completion_date = Some(String::from("2025-06-11T08:00:00Z"));
    persistence.create_work_order(&completed).unwrap();

    // Past visit, cancelled: not overdue.
    let mut cancelled = sample_work_order("WO202506100003", "2025-06-10T10:00:00Z");
    cancelled.visit_date = Some("2025-06-10".parse().unwrap());
    cancelled.work_order_status = WorkOrderStatus::Cancelled;
    persistence.create_work_order(&cancelled).unwrap();

    // Visit today: not overdue.
    let mut due_today = sample_work_order("WO202506100004", "2025-06-10T11:00:00Z");
    due_today.visit_date = Some(today());
    persistence.create_work_order(&due_today).unwrap();

    // No visit date: not overdue.
    let mut undated = sample_work_order("WO202506100005", "2025-06-10T12:00:00Z");
    undated.visit_date = None;
    persistence.create_work_order(&undated).unwrap();

    let stats = persistence
        .collect_stats(&WorkOrderFilter::default(), today())
        .unwrap();
    assert_eq!(stats.overdue_count, 1);
}

#[test]
fn test_completion_rate_and_average_hours() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    // Completed 36 hours after visit midnight.
    let mut fast = sample_work_order("WO202506100001", "2025-06-10T08:00:00Z");
    fast.visit_date = Some("2025-01-10".parse().unwrap());
    fast.work_order_status = WorkOrderStatus::Completed;
    fast.completion_date = Some(String::from("2025-01-11T12:00:00Z"));
    persistence.create_work_order(&fast).unwrap();

    // Completed 60 hours after visit midnight.
    let mut slow = sample_work_order("WO202506100002", "2025-06-10T09:00:00Z");
    slow.visit_date = Some("2025-01-10".parse().unwrap());
    slow.work_order_status = WorkOrderStatus::Completed;
    slow.completion_date = Some(String::from("2025-01-12T12:00:00Z"));
    persistence.create_work_order(&slow).unwrap();

    // Completed without a visit date: counts for rate, not for hours.
    let mut undated = sample_work_order("WO202506100003", "2025-06-10T10:00:00Z");
    undated.visit_date = None;
    undated.work_order_status = WorkOrderStatus::Completed;
    undated.completion_date = Some(String::from("2025-01-13T12:00:00Z"));
    persistence.create_work_order(&undated).unwrap();

    // Still pending.
    let pending = sample_work_order("WO202506100004", "2025-06-10T11:00:00Z");
    persistence.create_work_order(&pending).unwrap();

    let stats = persistence
        .collect_stats(&WorkOrderFilter::default(), today())
        .unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed_count, 3);
    assert!((stats.completion_rate - 75.0).abs() < f64::EPSILON);
    assert!((stats.avg_completion_hours - 48.0).abs() < f64::EPSILON);
}

#[test]
fn test_completion_rate_is_rounded_to_two_decimals() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let mut done = sample_work_order("WO202506100001", "2025-06-10T08:00:00Z");
    done.work_order_status = WorkOrderStatus::Completed;
    done.completion_date = Some(String::from("2025-06-11T08:00:00Z"));
    persistence.create_work_order(&done).unwrap();

    for (number, stamp) in [
        ("WO202506100002", "2025-06-10T09:00:00Z"),
        ("WO202506100003", "2025-06-10T10:00:00Z"),
    ] {
        persistence
            .create_work_order(&sample_work_order(number, stamp))
            .unwrap();
    }

    // 1 of 3 completed: 33.333... rounds to 33.33.
    let stats = persistence
        .collect_stats(&WorkOrderFilter::default(), today())
        .unwrap();
    assert_eq!(stats.completed_count, 1);
    assert!((stats.completion_rate - 33.33).abs() < f64::EPSILON);
}

#[test]
fn test_stats_respect_filters() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let mut in_scope = sample_work_order("WO202506100001", "2025-06-10T08:00:00Z");
    in_scope.work_order_type = String::from("Installation");
    persistence.create_work_order(&in_scope).unwrap();

    let mut out_of_scope = sample_work_order("WO202506100002", "2025-06-10T09:00:00Z");
    out_of_scope.work_order_type = String::from("Maintenance");
    persistence.create_work_order(&out_of_scope).unwrap();

    let filter = WorkOrderFilter {
        work_order_type: Some(String::from("Installation")),
        ..WorkOrderFilter::default()
    };
    let stats = persistence.collect_stats(&filter, today()).unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.by_type.get("Maintenance"), None);
}
