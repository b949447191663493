//! The chrono edge of the engine: calendar dates, `"HH:mm"` clock times and
//! weekday names on the outside, `Ms` instants on the inside.
//!
//! All anchoring uses a single reference timezone (UTC). Days are therefore
//! exactly 24 hours wide and a day window is `[midnight, midnight + 24h)`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use crate::engine::EngineError;
use crate::model::{Ms, Span};

pub const MINUTE_MS: Ms = 60_000;
pub const DAY_MS: Ms = 24 * 60 * MINUTE_MS;

pub fn parse_date(s: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| EngineError::Validation {
        field: "date",
        message: format!("not a YYYY-MM-DD date: {s:?}"),
    })
}

pub fn parse_clock(s: &str) -> Result<NaiveTime, EngineError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| EngineError::InvalidTime(s.to_string()))
}

/// The instant of `date` at `time`, in the reference timezone.
pub fn at_clock(date: NaiveDate, time: NaiveTime) -> Ms {
    Utc.from_utc_datetime(&date.and_time(time)).timestamp_millis()
}

/// The full calendar day as a half-open window.
pub fn day_window(date: NaiveDate) -> Span {
    let start = Utc
        .from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .timestamp_millis();
    Span::new(start, start + DAY_MS)
}

/// Presentation form of a slot start: local clock time, `"HH:mm"`.
pub fn clock_label(t: Ms) -> String {
    match DateTime::from_timestamp_millis(t) {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => String::from("--:--"),
    }
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Case-insensitive match of a configured `day` against a calendar date.
pub fn matches_weekday(day: &str, date: NaiveDate) -> bool {
    day.eq_ignore_ascii_case(weekday_name(date))
}
