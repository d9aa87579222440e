//! Calendar-day resolution for message timestamps.

use std::{fmt, str::FromStr};

use chrono::{FixedOffset, Local, LocalResult, NaiveDate, Offset, TimeZone, Utc};
use thiserror::Error;

/// Time zone in which calendar days (and date separators) are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timezone `{0}`: expected `local`, `utc` or an offset like `+05:30`")]
pub struct InvalidCalendarZone(pub String);

impl CalendarZone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Returns the calendar day of a millisecond timestamp, or `None` when the
    /// timestamp cannot be represented.
    pub fn day_of(&self, timestamp_ms: i64) -> Option<NaiveDate> {
        match self {
            CalendarZone::Local => pick(Local.timestamp_millis_opt(timestamp_ms))
                .map(|dt| dt.date_naive()),
            CalendarZone::Fixed(offset) => pick(offset.timestamp_millis_opt(timestamp_ms))
                .map(|dt| dt.date_naive()),
        }
    }

    /// Formats the wall-clock time of a timestamp as `HH:MM`.
    pub fn format_time(&self, timestamp_ms: i64) -> String {
        let formatted = match self {
            CalendarZone::Local => pick(Local.timestamp_millis_opt(timestamp_ms))
                .map(|dt| dt.format("%H:%M").to_string()),
            CalendarZone::Fixed(offset) => pick(offset.timestamp_millis_opt(timestamp_ms))
                .map(|dt| dt.format("%H:%M").to_string()),
        };

        formatted.unwrap_or_else(|| "??:??".to_owned())
    }
}

fn pick<T>(result: LocalResult<T>) -> Option<T> {
    match result {
        LocalResult::Single(value) => Some(value),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

impl FromStr for CalendarZone {
    type Err = InvalidCalendarZone;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("local") {
            return Ok(CalendarZone::Local);
        }
        if value.eq_ignore_ascii_case("utc") || value == "Z" {
            return Ok(CalendarZone::utc());
        }

        value
            .parse::<FixedOffset>()
            .map(CalendarZone::Fixed)
            .map_err(|_| InvalidCalendarZone(raw.to_owned()))
    }
}

impl fmt::Display for CalendarZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarZone::Local => f.write_str("local"),
            CalendarZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
