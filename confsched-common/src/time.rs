//! Time-of-day parsing for order-file header lines
//!
//! Session and session-group headers carry a `HH:MM--HH:MM` token
//! (single-digit hours allowed, e.g. `9:00--10:30`). The parsers here return
//! `Option` so callers can attach file/line context to the failure.

use chrono::NaiveTime;

/// Separator between the start and end of a time range
const RANGE_SEPARATOR: &str = "--";

/// Parse a single `H:MM` / `HH:MM` time-of-day token.
pub fn parse_time_of_day(token: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(token.trim(), "%H:%M").ok()
}

/// Parse a `start--end` time-range token into (start, end).
///
/// Returns `None` if the separator is missing or either side is not a
/// valid time of day.
pub fn parse_time_range(token: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = token.trim().split_once(RANGE_SEPARATOR)?;
    Some((parse_time_of_day(start)?, parse_time_of_day(end)?))
}
