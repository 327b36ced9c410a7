use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ProcessingError, Result};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%Y/%m/%d"];

/// Parse a timestamp written in any of the mixed layouts found in the raw files.
///
/// Ambiguous numeric dates are read day first (`01/02/2020` is 1 February). Date-only
/// values are placed at midnight.
///
/// # Examples
/// ```
/// use aqi_processor::utils::parse_day_first;
///
/// let ts = parse_day_first("05/01/2020 13:00").unwrap();
/// assert_eq!(ts.to_string(), "2020-01-05 13:00:00");
/// ```
pub fn parse_day_first(raw: &str) -> Result<NaiveDateTime> {
    let value = raw.trim();

    if let Some(ts) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(ts);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Unrecognised date: '{}'", raw)))
}
