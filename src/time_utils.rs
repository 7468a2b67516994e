// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Wall-clock time of a Strava timestamp, read as written (no zone shift).
///
/// Accepts RFC3339 (`2023-05-01T08:15:00Z`), a naive date-time or a bare date.
fn parse_local(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar year of a Strava timestamp.
pub fn year_of(date: &str) -> Option<i32> {
    parse_local(date).map(|dt| dt.year())
}

/// Short month label of a Strava timestamp, e.g. `May 2023`.
pub fn month_label(date: &str) -> Option<String> {
    parse_local(date).map(|dt| dt.format("%b %Y").to_string())
}
