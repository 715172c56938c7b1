//! Recurrence rule text parser.
//!
//! Accepts the semicolon-separated `KEY=VALUE` grammar of RFC 5545 RECUR,
//! restricted to the parts this engine evaluates: FREQ, INTERVAL, BYDAY,
//! BYMONTHDAY, BYMONTH, BYSETPOS, WKST, COUNT, UNTIL. Recognized parts the
//! engine does not support fail parsing instead of being silently dropped.

mod error;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};

use crate::rule::{Frequency, RecurrenceRule, Until, Weekday, WeekdayNum};

/// Accumulates parsed parts before the final rule is assembled.
#[derive(Debug, Default)]
struct RuleParts {
    freq: Option<Frequency>,
    interval: Option<u32>,
    count: Option<u32>,
    until: Option<Until>,
    wkst: Option<Weekday>,
    by_day: Vec<WeekdayNum>,
    by_monthday: Vec<i8>,
    by_month: Vec<u8>,
    by_setpos: Vec<i16>,
}

/// Parses recurrence rule text into a [`RecurrenceRule`].
///
/// A leading `RRULE:` prefix is tolerated so stored property lines can be
/// passed through unchanged.
///
/// ## Errors
///
/// Returns a [`ParseError`] if the text violates the grammar, names an
/// unsupported or unknown part, or fails validation (zero interval/count,
/// out-of-range list values, COUNT together with UNTIL, ordinal BYDAY
/// entries with DAILY or WEEKLY frequency).
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_rule(text: &str) -> ParseResult<RecurrenceRule> {
    let text = text.trim();
    let text = text.strip_prefix("RRULE:").unwrap_or(text);

    if text.is_empty() {
        tracing::debug!("Empty rule text");
        return Err(ParseError::new(ParseErrorKind::EmptyRule));
    }

    let mut parts = RuleParts::default();
    for part in text.split(';') {
        parse_part(&mut parts, part)?;
    }

    assemble(parts)
}

/// Parses a single `KEY=VALUE` rule part into the accumulator.
fn parse_part(parts: &mut RuleParts, part: &str) -> ParseResult<()> {
    let part = part.trim();
    let Some(eq_pos) = part.find('=') else {
        return Err(ParseError::new(ParseErrorKind::MalformedPart).with_part(part));
    };

    let key = &part[..eq_pos];
    let value = &part[eq_pos + 1..];
    if value.is_empty() {
        return Err(ParseError::new(ParseErrorKind::MalformedPart).with_part(part));
    }

    match key.trim().to_ascii_uppercase().as_str() {
        "FREQ" => {
            parts.freq = Some(parse_frequency(value)?);
        }
        "INTERVAL" => {
            parts.interval = Some(values::parse_positive(value, ParseErrorKind::InvalidInterval)?);
        }
        "COUNT" => {
            if parts.until.is_some() {
                return Err(ParseError::new(ParseErrorKind::BoundConflict).with_part(part));
            }
            parts.count = Some(values::parse_positive(value, ParseErrorKind::InvalidCount)?);
        }
        "UNTIL" => {
            if parts.count.is_some() {
                return Err(ParseError::new(ParseErrorKind::BoundConflict).with_part(part));
            }
            parts.until = Some(values::parse_until(value)?);
        }
        "WKST" => {
            parts.wkst = Some(
                Weekday::parse(value.trim())
                    .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidWeekday).with_part(part))?,
            );
        }
        "BYDAY" => parts.by_day = values::parse_byday(value)?,
        "BYMONTHDAY" => parts.by_monthday = values::parse_monthday_list(value)?,
        "BYMONTH" => parts.by_month = values::parse_month_list(value)?,
        "BYSETPOS" => parts.by_setpos = values::parse_setpos_list(value)?,
        "BYSECOND" | "BYMINUTE" | "BYHOUR" | "BYYEARDAY" | "BYWEEKNO" => {
            return Err(ParseError::new(ParseErrorKind::UnsupportedPart).with_part(part));
        }
        _ => return Err(ParseError::new(ParseErrorKind::UnknownPart).with_part(part)),
    }
    Ok(())
}

/// Parses the FREQ value, distinguishing unsupported sub-daily tokens from
/// unknown ones.
fn parse_frequency(value: &str) -> ParseResult<Frequency> {
    let value = value.trim();
    Frequency::parse(value).ok_or_else(|| {
        if Frequency::is_unsupported_token(value) {
            ParseError::new(ParseErrorKind::UnsupportedFrequency).with_part(value)
        } else {
            ParseError::new(ParseErrorKind::UnknownFrequency).with_part(value)
        }
    })
}

/// Assembles and validates the final rule from parsed parts.
fn assemble(parts: RuleParts) -> ParseResult<RecurrenceRule> {
    let Some(freq) = parts.freq else {
        return Err(ParseError::new(ParseErrorKind::MissingFrequency));
    };

    // Ordinal BYDAY entries only make sense where a frequency period spans
    // more than one week.
    if matches!(freq, Frequency::Daily | Frequency::Weekly)
        && let Some(entry) = parts.by_day.iter().find(|d| d.ordinal.is_some())
    {
        return Err(ParseError::new(ParseErrorKind::OrdinalNotAllowed).with_part(entry.to_string()));
    }

    let mut rule = RecurrenceRule::new(freq)
        .with_by_day(parts.by_day)
        .with_by_monthday(parts.by_monthday)
        .with_by_month(parts.by_month)
        .with_by_setpos(parts.by_setpos);

    if let Some(interval) = parts.interval {
        rule = rule.with_interval(interval);
    }
    if let Some(count) = parts.count {
        rule = rule.with_count(count);
    }
    if let Some(until) = parts.until {
        rule = rule.with_until(until);
    }
    if let Some(wkst) = parts.wkst {
        rule = rule.with_wkst(wkst);
    }

    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_daily() {
        let rule = parse_rule("FREQ=DAILY;COUNT=10").unwrap();
        assert_eq!(rule.freq(), Frequency::Daily);
        assert_eq!(rule.count(), Some(10));
        assert_eq!(rule.interval(), 1);
    }

    #[test]
    fn parse_weekly_byday() {
        let rule = parse_rule("FREQ=WEEKLY;BYDAY=MO,WE,FR").unwrap();
        assert_eq!(rule.freq(), Frequency::Weekly);
        assert_eq!(rule.by_day().len(), 3);
    }

    #[test]
    fn parse_monthly_nth() {
        let rule = parse_rule("FREQ=MONTHLY;BYDAY=-1FR").unwrap();
        assert_eq!(rule.by_day().len(), 1);
        assert_eq!(rule.by_day()[0].ordinal, Some(-1));
        assert_eq!(rule.by_day()[0].weekday, Weekday::Friday);
    }

    #[test]
    fn parse_tolerates_rrule_prefix_and_case() {
        let rule = parse_rule("RRULE:freq=daily;interval=2").unwrap();
        assert_eq!(rule.freq(), Frequency::Daily);
        assert_eq!(rule.interval(), 2);
    }

    #[test]
    fn parse_until_count_conflict() {
        let err = parse_rule("FREQ=DAILY;COUNT=10;UNTIL=20260131").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BoundConflict);

        let err = parse_rule("FREQ=DAILY;UNTIL=20260131;COUNT=10").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BoundConflict);
    }

    #[test]
    fn parse_missing_frequency() {
        let err = parse_rule("INTERVAL=2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingFrequency);
    }

    #[test]
    fn parse_unsupported_frequency() {
        let err = parse_rule("FREQ=HOURLY").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnsupportedFrequency);

        let err = parse_rule("FREQ=FORTNIGHTLY").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownFrequency);
    }

    #[test]
    fn parse_unsupported_part() {
        let err = parse_rule("FREQ=DAILY;BYHOUR=9").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnsupportedPart);
    }

    #[test]
    fn parse_unknown_part() {
        let err = parse_rule("FREQ=DAILY;X-CUSTOM=1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownPart);
    }

    #[test]
    fn parse_rejects_zero_interval() {
        let err = parse_rule("FREQ=DAILY;INTERVAL=0").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidInterval);
    }

    #[test]
    fn parse_rejects_zero_count() {
        let err = parse_rule("FREQ=DAILY;COUNT=0").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidCount);
    }

    #[test]
    fn parse_rejects_ordinal_byday_for_weekly() {
        let err = parse_rule("FREQ=WEEKLY;BYDAY=2TU").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::OrdinalNotAllowed);

        assert!(parse_rule("FREQ=MONTHLY;BYDAY=2TU").is_ok());
    }

    #[test]
    fn parse_empty_rule() {
        let err = parse_rule("  ").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyRule);
    }

    #[test]
    fn parse_malformed_part() {
        let err = parse_rule("FREQ=DAILY;BOGUS").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedPart);

        let err = parse_rule("FREQ=").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedPart);
    }
}
