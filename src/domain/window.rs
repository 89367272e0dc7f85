//! Fetch window resolution.
//!
//! Nord Pool delivery days start at 22:00 UTC (midnight EET), so every
//! relative window is anchored on 22:00 UTC of the current UTC date.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::AppError;

const API_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const INVALID_FORMAT: &str = "Invalid date format. Please use ISO format (e.g., 2025-05-07T22:00:00Z)";

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if start >= end {
            return Err(AppError::usage(format!(
                "Start time {} must be before end time {}.",
                format_api_timestamp(start),
                format_api_timestamp(end)
            )));
        }
        Ok(Self { start, end })
    }
}

/// How the user asked for the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSelector {
    /// Explicit start, optional explicit end.
    Range { start: String, end: Option<String> },
    /// Yesterday 22:00 to today 22:00.
    Today,
    /// Today 22:00 to tomorrow 22:00.
    Tomorrow,
    /// Three delivery days back through tomorrow; optional explicit end.
    Default { end: Option<String> },
}

pub fn resolve_window(selector: &WindowSelector, now: DateTime<Utc>) -> Result<TimeWindow, AppError> {
    let anchor = delivery_anchor(now);
    let day = Duration::days(1);

    let (start, end) = match selector {
        WindowSelector::Tomorrow => (anchor, anchor + day),
        WindowSelector::Today => (anchor - day, anchor),
        WindowSelector::Range { start, end } => {
            let end = match end {
                Some(raw) => parse_timestamp(raw)?,
                None => anchor + day,
            };
            (parse_timestamp(start)?, end)
        }
        WindowSelector::Default { end } => {
            let end = match end {
                Some(raw) => parse_timestamp(raw)?,
                None => anchor + day,
            };
            (anchor - Duration::days(3), end)
        }
    };

    TimeWindow::new(start, end)
}

/// 22:00:00 UTC on the UTC calendar date of `now`.
pub fn delivery_anchor(now: DateTime<Utc>) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN);
    now.date_naive().and_time(time).and_utc()
}

/// Parse an ISO 8601 timestamp.
///
/// Accepts RFC 3339 with `Z` or an explicit offset, a naive datetime (read
/// as UTC), or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }
    // Hour-only form; chrono needs a minute to build a time.
    if trimmed.len() == 13 {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&format!("{trimmed}:00"), "%Y-%m-%dT%H:%M") {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(AppError::usage(INVALID_FORMAT))
}

/// Timestamp format used in API query strings and logs.
pub fn format_api_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(API_FORMAT).to_string()
}
