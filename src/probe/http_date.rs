//! Strict RFC-1123 HTTP date parsing.
//!
//! Layout: `Mon, 02 Jan 2006 15:04:05 GMT`. The weekday must be a valid
//! short name but is not checked against the date. The day of month must be
//! two digits. The zone is `GMT`, `GMT±H` (up to 23 hours) or any upper-case
//! abbreviation, which carries no offset. The obsolete RFC-850 and asctime
//! layouts that HTTP/1.1 also allows are rejected.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use thiserror::Error;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const STAMP_FORMAT: &str = "%d %b %Y %H:%M:%S";

#[derive(Debug, Error)]
pub enum HttpDateError {
    #[error("header missing")]
    Missing,

    #[error("header is not visible ASCII")]
    NotAscii,

    #[error("{value:?} is not an RFC-1123 date: {reason}")]
    Malformed { value: String, reason: &'static str },

    #[error("{value:?} is not a valid date: {source}")]
    Invalid {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parse an RFC-1123 date as sent in `Last-Modified`.
pub fn parse_http_date(value: &str) -> Result<DateTime<Utc>, HttpDateError> {
    let malformed = |reason: &'static str| HttpDateError::Malformed {
        value: value.to_string(),
        reason,
    };

    let (weekday, rest) = value
        .split_once(", ")
        .ok_or_else(|| malformed("expected a weekday followed by \", \""))?;
    if !WEEKDAYS.iter().any(|day| day.eq_ignore_ascii_case(weekday)) {
        return Err(malformed("unknown weekday"));
    }

    let (stamp, zone) = rest.rsplit_once(' ').ok_or_else(|| malformed("missing zone"))?;
    check_stamp_layout(stamp).map_err(|reason| malformed(reason))?;
    let offset = zone_offset(zone).ok_or_else(|| malformed("unrecognised zone"))?;

    let naive = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).map_err(|source| {
        HttpDateError::Invalid {
            value: value.to_string(),
            source,
        }
    })?;

    Ok(naive.and_utc() - offset)
}

fn all_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Field widths of `02 Jan 2006 15:04:05`; chrono checks the values.
fn check_stamp_layout(stamp: &str) -> Result<(), &'static str> {
    let fields: Vec<&str> = stamp.split(' ').collect();
    let [day, month, year, clock] = fields.as_slice() else {
        return Err("expected \"02 Jan 2006 15:04:05\"");
    };

    if !all_digits(day, 2, 2) {
        return Err("day must be two digits");
    }
    if month.len() != 3 || !month.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err("month must be a three-letter name");
    }
    if !all_digits(year, 4, 4) {
        return Err("year must be four digits");
    }

    let clock: Vec<&str> = clock.split(':').collect();
    match clock.as_slice() {
        [hour, minute, second]
            if all_digits(hour, 1, 2) && all_digits(minute, 2, 2) && all_digits(second, 2, 2) =>
        {
            Ok(())
        }
        _ => Err("time must be hh:mm:ss"),
    }
}

/// Offset east of UTC carried by the zone field.
fn zone_offset(zone: &str) -> Option<TimeDelta> {
    if let Some(shift) = zone.strip_prefix("GMT") {
        if shift.is_empty() {
            return Some(TimeDelta::zero());
        }
        let (sign, hours) = if let Some(hours) = shift.strip_prefix('+') {
            (1, hours)
        } else if let Some(hours) = shift.strip_prefix('-') {
            (-1, hours)
        } else {
            return None;
        };
        if !all_digits(hours, 1, 2) {
            return None;
        }
        let hours: i64 = hours.parse().ok()?;
        return (hours <= 23).then(|| TimeDelta::hours(sign * hours));
    }

    let bytes = zone.as_bytes();
    let abbreviation = match bytes.len() {
        3 => true,
        4 => bytes[3] == b'T',
        5 => bytes[3] != b'T' && bytes[4] == b'T',
        _ => false,
    };
    let known_mixed_case = zone == "ChST" || zone == "MeST";

    if known_mixed_case || (abbreviation && bytes.iter().all(u8::is_ascii_uppercase)) {
        Some(TimeDelta::zero())
    } else {
        None
    }
}
