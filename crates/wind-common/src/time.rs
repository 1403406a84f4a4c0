//! Model time selection.
//!
//! The upstream publishes analyses on a 3-hourly cadence. Requests first try
//! the current 3-hour slot and fall back to whatever the upstream has last.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// Model output cadence in seconds.
const CYCLE_SECONDS: i64 = 3 * 3600;

/// Truncate an instant down to the start of its 3-hour slot.
pub fn canonical_3h(at: DateTime<Utc>) -> DateTime<Utc> {
    let secs = at.timestamp();
    let into_cycle = secs.rem_euclid(CYCLE_SECONDS);
    let subsec = Duration::nanoseconds(at.timestamp_subsec_nanos() as i64);
    at - Duration::seconds(into_cycle) - subsec
}

/// The 3-hour slot containing the current instant.
pub fn canonical_3h_now() -> DateTime<Utc> {
    canonical_3h(Utc::now())
}

/// ISO-8601 with whole seconds and a `Z` suffix.
pub fn format_iso(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse an ISO 8601 instant as the upstream reports it.
pub fn parse_iso(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Without timezone (assume UTC)
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

/// Time selection for a single upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeExpr {
    /// An explicit instant, sent with second precision.
    At(DateTime<Utc>),
    /// Whatever the upstream has published most recently.
    Latest,
}

impl TimeExpr {
    /// Selector text placed inside the time brackets of a griddap query.
    pub fn selector(&self) -> String {
        match self {
            TimeExpr::At(dt) => format_iso(dt),
            TimeExpr::Latest => "last".to_string(),
        }
    }
}

impl fmt::Display for TimeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector())
    }
}
