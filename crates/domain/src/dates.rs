// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flexible date parsing for imported tabular data.
//!
//! Spreadsheet exports carry dates as relative keywords, numeric serial
//! values, or a handful of literal formats. Parsing is lenient: a value that
//! cannot be interpreted yields `None` and the caller records a warning
//! rather than failing the row.

use chrono::{Days, NaiveDate};

/// Spreadsheet serial day 0, i.e. the epoch used by common spreadsheet tools.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serial values outside this range are treated as ordinary numbers, not
/// dates (roughly 1905 through 2173).
const SERIAL_RANGE: std::ops::RangeInclusive<i64> = 2_000..=100_000;

/// Literal formats tried in order. First match wins.
const LITERAL_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Parses a flexible date value from an imported cell.
///
/// Accepted inputs, tried in order:
/// 1. Relative keywords: `today`, `tomorrow`, `yesterday`, including common
///    misspellings, case-insensitive.
/// 2. Numeric spreadsheet serial dates (days since 1899-12-30).
/// 3. Literal date strings in several formats; a trailing time portion is
///    ignored.
///
/// `today` is supplied by the caller so the function stays deterministic.
/// Returns `None` for empty or unparseable input.
#[must_use]
pub fn parse_flexible_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = parse_relative_keyword(trimmed, today) {
        return Some(date);
    }

    if let Some(date) = parse_serial_date(trimmed) {
        return Some(date);
    }

    // Strip a time portion such as "2025-01-10 14:30" or an RFC 3339 suffix.
    let date_part: &str = trimmed
        .split_once(|c: char| c == ' ' || c == 'T')
        .map_or(trimmed, |(date, _)| date);

    LITERAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn parse_relative_keyword(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    match s.to_lowercase().as_str() {
        "today" | "toady" | "todya" => Some(today),
        "tomorrow" | "tommorow" | "tomorow" | "tommorrow" => {
            today.checked_add_days(Days::new(1))
        }
        "yesterday" | "yesturday" | "yestarday" | "yesterdy" => {
            today.checked_sub_days(Days::new(1))
        }
        _ => None,
    }
}

fn parse_serial_date(s: &str) -> Option<NaiveDate> {
    // Serial cells can arrive as "45678" or "45678.0".
    let serial: i64 = if let Ok(n) = s.parse::<i64>() {
        n
    } else {
        let f: f64 = s.parse::<f64>().ok()?;
        if f.fract() != 0.0 {
            return None;
        }
        // The fractional part is zero, so this cast is exact.
        #[allow(clippy::cast_possible_truncation)]
        {
            f as i64
        }
    };

    if !SERIAL_RANGE.contains(&serial) {
        return None;
    }

    let (y, m, d) = SERIAL_EPOCH;
    let epoch: NaiveDate = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_days(Days::new(u64::try_from(serial).ok()?))
}
