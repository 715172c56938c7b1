//! The recurrence rule definition.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{Frequency, Weekday, WeekdayNum};

/// UNTIL bound of a rule.
///
/// A bare date is inclusive through the end of that local day in the
/// evaluation zone; a local date-time is interpreted in the evaluation zone;
/// a UTC date-time is a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    Date(NaiveDate),
    Local(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl fmt::Display for Until {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y%m%d")),
            Self::Local(dt) => write!(f, "{}", dt.format("%Y%m%dT%H%M%S")),
            Self::Utc(dt) => write!(f, "{}", dt.format("%Y%m%dT%H%M%SZ")),
        }
    }
}

/// Recurrence rule.
///
/// Immutable once constructed; built either from text via
/// [`crate::parse::parse_rule`] or programmatically through the builder
/// methods. Defines a pattern for recurring task due dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Recurrence frequency.
    pub(crate) freq: Frequency,

    /// Recurrence interval (>= 1). Defines how often the frequency repeats.
    pub(crate) interval: u32,

    /// Number of occurrences (mutually exclusive with until).
    pub(crate) count: Option<u32>,

    /// End bound of the recurrence (mutually exclusive with count).
    pub(crate) until: Option<Until>,

    /// Week start day. Aligns weekly periods when interval > 1.
    pub(crate) wkst: Weekday,

    /// By-day list with optional occurrence numbers.
    pub(crate) by_day: Vec<WeekdayNum>,

    /// By-monthday list (-31 to 31, excluding 0).
    pub(crate) by_monthday: Vec<i8>,

    /// By-month list (1-12).
    pub(crate) by_month: Vec<u8>,

    /// By-setpos list (-366 to 366, excluding 0).
    /// Filters on position within the frequency period.
    pub(crate) by_setpos: Vec<i16>,
}

impl RecurrenceRule {
    /// Creates a rule with the given frequency and defaults otherwise.
    #[must_use]
    pub const fn new(freq: Frequency) -> Self {
        Self {
            freq,
            interval: 1,
            count: None,
            until: None,
            wkst: Weekday::Monday,
            by_day: Vec::new(),
            by_monthday: Vec::new(),
            by_month: Vec::new(),
            by_setpos: Vec::new(),
        }
    }

    /// Creates a daily recurrence rule.
    #[must_use]
    pub const fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    /// Creates a weekly recurrence rule.
    #[must_use]
    pub const fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    /// Creates a monthly recurrence rule.
    #[must_use]
    pub const fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    /// Creates a yearly recurrence rule.
    #[must_use]
    pub const fn yearly() -> Self {
        Self::new(Frequency::Yearly)
    }

    /// Sets the interval.
    ///
    /// ## Panics
    ///
    /// Panics if interval is 0.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        assert!(interval >= 1, "interval must be at least 1");
        self.interval = interval;
        self
    }

    /// Sets the count.
    ///
    /// ## Panics
    ///
    /// Panics if count is 0.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        assert!(count >= 1, "count must be at least 1");
        self.count = Some(count);
        self.until = None; // Mutually exclusive
        self
    }

    /// Sets the until bound.
    #[must_use]
    pub fn with_until(mut self, until: Until) -> Self {
        self.until = Some(until);
        self.count = None; // Mutually exclusive
        self
    }

    /// Sets the by-day list.
    #[must_use]
    pub fn with_by_day(mut self, days: Vec<WeekdayNum>) -> Self {
        self.by_day = days;
        self
    }

    /// Sets the by-monthday list.
    #[must_use]
    pub fn with_by_monthday(mut self, monthdays: Vec<i8>) -> Self {
        self.by_monthday = monthdays;
        self
    }

    /// Sets the by-month list.
    #[must_use]
    pub fn with_by_month(mut self, months: Vec<u8>) -> Self {
        self.by_month = months;
        self
    }

    /// Sets the by-setpos list.
    #[must_use]
    pub fn with_by_setpos(mut self, positions: Vec<i16>) -> Self {
        self.by_setpos = positions;
        self
    }

    /// Sets the week start day.
    #[must_use]
    pub fn with_wkst(mut self, wkst: Weekday) -> Self {
        self.wkst = wkst;
        self
    }

    /// Returns the frequency.
    #[must_use]
    pub const fn freq(&self) -> Frequency {
        self.freq
    }

    /// Returns the interval.
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns the count bound, if any.
    #[must_use]
    pub const fn count(&self) -> Option<u32> {
        self.count
    }

    /// Returns the until bound, if any.
    #[must_use]
    pub const fn until(&self) -> Option<Until> {
        self.until
    }

    /// Returns the week start day.
    #[must_use]
    pub const fn wkst(&self) -> Weekday {
        self.wkst
    }

    /// Returns the by-day list.
    #[must_use]
    pub fn by_day(&self) -> &[WeekdayNum] {
        &self.by_day
    }

    /// Returns the by-monthday list.
    #[must_use]
    pub fn by_monthday(&self) -> &[i8] {
        &self.by_monthday
    }

    /// Returns the by-month list.
    #[must_use]
    pub fn by_month(&self) -> &[u8] {
        &self.by_month
    }

    /// Returns the by-setpos list.
    #[must_use]
    pub fn by_setpos(&self) -> &[i16] {
        &self.by_setpos
    }

    /// Returns true if the rule has neither count nor until bound.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.count.is_none() && self.until.is_none()
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        parts.push(format!("FREQ={}", self.freq));

        if self.interval != 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }

        if let Some(ref until) = self.until {
            parts.push(format!("UNTIL={until}"));
        }

        if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }

        if self.wkst != Weekday::Monday {
            parts.push(format!("WKST={}", self.wkst));
        }

        if !self.by_day.is_empty() {
            let s: Vec<_> = self.by_day.iter().map(ToString::to_string).collect();
            parts.push(format!("BYDAY={}", s.join(",")));
        }

        if !self.by_monthday.is_empty() {
            let s: Vec<_> = self.by_monthday.iter().map(ToString::to_string).collect();
            parts.push(format!("BYMONTHDAY={}", s.join(",")));
        }

        if !self.by_month.is_empty() {
            let s: Vec<_> = self.by_month.iter().map(ToString::to_string).collect();
            parts.push(format!("BYMONTH={}", s.join(",")));
        }

        if !self.by_setpos.is_empty() {
            let s: Vec<_> = self.by_setpos.iter().map(ToString::to_string).collect();
            parts.push(format!("BYSETPOS={}", s.join(",")));
        }

        write!(f, "{}", parts.join(";"))
    }
}

impl FromStr for RecurrenceRule {
    type Err = crate::parse::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse_rule(s)
    }
}
