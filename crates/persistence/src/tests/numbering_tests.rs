// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Numbering service tests.
//!
//! These tests create their own records "now" so that the since-midnight
//! counting window covers them.

use crate::tests::sample_work_order;
use crate::Persistence;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use fieldwork_domain::validate_work_order_number;

fn now_pair() -> (DateTime<Local>, String) {
    let now: DateTime<Local> = Local::now();
    let stamp: String = now
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    (now, stamp)
}

#[test]
fn test_first_number_of_the_day() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (now, _) = now_pair();

    let number = persistence.generate_work_order_number(now).unwrap();
    let day: String = now.date_naive().format("%Y%m%d").to_string();
    assert_eq!(number, format!("WO{day}0001"));
    assert!(validate_work_order_number(&number).is_ok());
}

#[test]
fn test_sequence_counts_records_created_today() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (now, stamp) = now_pair();

    let first = persistence.generate_work_order_number(now).unwrap();
    persistence
        .create_work_order(&sample_work_order(&first, &stamp))
        .unwrap();

    let second = persistence.generate_work_order_number(now).unwrap();
    let day: String = now.date_naive().format("%Y%m%d").to_string();
    assert_eq!(second, format!("WO{day}0002"));
}

#[test]
fn test_collision_falls_back_to_hyphenated_variant() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (now, stamp) = now_pair();
    let day: String = now.date_naive().format("%Y%m%d").to_string();

    // Two records created today, the second occupying the number the
    // counter would assign next.
    persistence
        .create_work_order(&sample_work_order(&format!("WO{day}0001"), &stamp))
        .unwrap();
    persistence
        .create_work_order(&sample_work_order(&format!("WO{day}0003"), &stamp))
        .unwrap();

    let number = persistence.generate_work_order_number(now).unwrap();
    assert_eq!(number, format!("WO-{day}-0004"));
    assert!(validate_work_order_number(&number).is_ok());
}

#[test]
fn test_records_before_midnight_do_not_count() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (now, _) = now_pair();

    // A record from long before today's local midnight.
    persistence
        .create_work_order(&sample_work_order("WO201001010001", "2010-01-01T08:00:00Z"))
        .unwrap();

    let number = persistence.generate_work_order_number(now).unwrap();
    let day: String = now.date_naive().format("%Y%m%d").to_string();
    assert_eq!(number, format!("WO{day}0001"));
}
