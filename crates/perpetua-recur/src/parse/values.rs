//! Value parsers for the individual rule parts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rule::{Until, Weekday, WeekdayNum};

/// Parses a positive integer (INTERVAL, COUNT).
pub(super) fn parse_positive(value: &str, kind: ParseErrorKind) -> ParseResult<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) | Err(_) => Err(ParseError::new(kind).with_part(value)),
    }
}

/// Parses an UNTIL value: `YYYYMMDD`, `YYYYMMDD'T'HHMMSS`, or the same with
/// a trailing `Z` for UTC.
///
/// ## Errors
/// Returns `InvalidUntil` for anything else.
pub(super) fn parse_until(value: &str) -> ParseResult<Until> {
    let value = value.trim();
    let invalid = || ParseError::new(ParseErrorKind::InvalidUntil).with_part(value);

    if let Some(datetime_str) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(datetime_str, "%Y%m%dT%H%M%S")
            .map_err(|_| invalid())?;
        return Ok(Until::Utc(DateTime::from_naive_utc_and_offset(naive, Utc)));
    }

    if value.contains('T') {
        let naive =
            NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").map_err(|_| invalid())?;
        return Ok(Until::Local(naive));
    }

    let date = NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| invalid())?;
    Ok(Until::Date(date))
}

/// Parses a BYDAY value (comma-separated weekdays with optional ordinals).
pub(super) fn parse_byday(value: &str) -> ParseResult<Vec<WeekdayNum>> {
    value
        .split(',')
        .map(|entry| parse_weekday_num(entry.trim()))
        .collect()
}

/// Parses a single weekday with optional ordinal (e.g., "MO", "1MO", "-1FR").
fn parse_weekday_num(entry: &str) -> ParseResult<WeekdayNum> {
    if entry.len() < 2 {
        return Err(ParseError::new(ParseErrorKind::InvalidWeekday).with_part(entry));
    }

    let weekday_str = &entry[entry.len() - 2..];
    let ordinal_str = &entry[..entry.len() - 2];

    let weekday = Weekday::parse(weekday_str)
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidWeekday).with_part(entry))?;

    let ordinal = if ordinal_str.is_empty() {
        None
    } else {
        let n = ordinal_str
            .parse::<i8>()
            .map_err(|_| ParseError::new(ParseErrorKind::OrdinalOutOfRange).with_part(entry))?;
        if n == 0 || !(-53..=53).contains(&n) {
            return Err(ParseError::new(ParseErrorKind::OrdinalOutOfRange).with_part(entry));
        }
        Some(n)
    };

    Ok(WeekdayNum { ordinal, weekday })
}

/// Parses a BYMONTHDAY list (-31 to 31, excluding 0).
pub(super) fn parse_monthday_list(value: &str) -> ParseResult<Vec<i8>> {
    value
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            match entry.parse::<i8>() {
                Ok(n) if n != 0 && (-31..=31).contains(&n) => Ok(n),
                Ok(_) | Err(_) => {
                    Err(ParseError::new(ParseErrorKind::InvalidMonthDay).with_part(entry))
                }
            }
        })
        .collect()
}

/// Parses a BYMONTH list (1-12).
pub(super) fn parse_month_list(value: &str) -> ParseResult<Vec<u8>> {
    value
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            match entry.parse::<u8>() {
                Ok(n) if (1..=12).contains(&n) => Ok(n),
                Ok(_) | Err(_) => {
                    Err(ParseError::new(ParseErrorKind::InvalidMonth).with_part(entry))
                }
            }
        })
        .collect()
}

/// Parses a BYSETPOS list (-366 to 366, excluding 0).
pub(super) fn parse_setpos_list(value: &str) -> ParseResult<Vec<i16>> {
    value
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            match entry.parse::<i16>() {
                Ok(n) if n != 0 && (-366..=366).contains(&n) => Ok(n),
                Ok(_) | Err(_) => {
                    Err(ParseError::new(ParseErrorKind::InvalidSetPos).with_part(entry))
                }
            }
        })
        .collect()
}
