//! Occurrence streams: a parsed rule coupled with a zoned series start.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use perpetua_core::constants::DEFAULT_MAX_IDLE_PERIODS;

use super::periods::period_candidates;
use super::timezone::resolve_civil;
use super::ExpandOptions;
use crate::rule::{RecurrenceRule, Until};

/// A recurrence pattern bound to a zoned series start.
///
/// The series start is the DTSTART equivalent: the wall-clock pattern
/// (time of day, default day selection) derives from it, `count` is tallied
/// from it, and occurrences are expressed in its zone. Exclusion dates
/// remove generated instances; extra inclusion dates are merged into the
/// stream in order.
#[derive(Debug, Clone)]
pub struct Recurrence {
    rule: RecurrenceRule,
    start: DateTime<Tz>,
    exdates: Vec<DateTime<Utc>>,
    rdates: Vec<DateTime<Utc>>,
    max_idle_periods: u32,
}

impl Recurrence {
    /// Creates a recurrence from a rule and a zoned series start.
    #[must_use]
    pub fn new(rule: RecurrenceRule, start: DateTime<Tz>) -> Self {
        Self {
            rule,
            start,
            exdates: Vec::new(),
            rdates: Vec::new(),
            max_idle_periods: DEFAULT_MAX_IDLE_PERIODS,
        }
    }

    /// Sets the exclusion dates.
    #[must_use]
    pub fn with_exdates(mut self, exdates: Vec<DateTime<Utc>>) -> Self {
        self.exdates = exdates;
        self
    }

    /// Sets the extra inclusion dates.
    #[must_use]
    pub fn with_rdates(mut self, rdates: Vec<DateTime<Utc>>) -> Self {
        self.rdates = rdates;
        self
    }

    /// Overrides the idle-period guard limit.
    #[must_use]
    pub fn with_max_idle_periods(mut self, max_idle_periods: u32) -> Self {
        self.max_idle_periods = max_idle_periods;
        self
    }

    /// Re-expresses the recurrence in another zone.
    ///
    /// The series start keeps its instant; rule evaluation and returned
    /// occurrences switch to the new zone's wall clock.
    #[must_use]
    pub fn in_zone(mut self, tz: Tz) -> Self {
        self.start = self.start.with_timezone(&tz);
        self
    }

    /// Returns the rule.
    #[must_use]
    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    /// Returns the zoned series start.
    #[must_use]
    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    /// Returns the evaluation zone.
    #[must_use]
    pub fn zone(&self) -> Tz {
        self.start.timezone()
    }

    /// Returns an iterator over all occurrences from the series start.
    ///
    /// The iterator ends when a `count` or `until` bound is reached, or when
    /// the idle-period guard decides an unbounded rule can never match
    /// again.
    #[must_use]
    pub fn occurrences(&self) -> Occurrences<'_> {
        let tz = self.start.timezone();

        let mut rdates: Vec<DateTime<Utc>> = self.rdates.clone();
        rdates.sort_unstable();
        rdates.dedup();

        Occurrences {
            recurrence: self,
            tz,
            origin: self.start.naive_local(),
            start_instant: self.start.with_timezone(&Utc),
            until: self.rule.until().map(|u| until_instant(u, tz)),
            remaining: self.rule.count(),
            period: 0,
            pending: VecDeque::new(),
            rdates: rdates.into(),
            idle_periods: 0,
            rule_done: false,
        }
    }

    /// ## Summary
    /// Computes the next occurrence strictly after the anchor.
    ///
    /// The anchor may be in any zone; comparison happens on instants. The
    /// result is expressed in the recurrence's zone. `None` means the rule
    /// is exhausted: no occurrence after the anchor exists within the
    /// rule's bounds.
    #[must_use]
    pub fn next_after<T: TimeZone>(&self, anchor: &DateTime<T>) -> Option<DateTime<Tz>> {
        let anchor_instant = anchor.with_timezone(&Utc);
        self.occurrences()
            .find(|occ| occ.with_timezone(&Utc) > anchor_instant)
    }

    /// ## Summary
    /// Collects occurrences within the options' half-open range.
    ///
    /// `range_start` is inclusive, `range_end` exclusive. Output is capped
    /// at `max_instances`; the cap is a safety valve for runaway queries,
    /// not a pagination mechanism.
    #[must_use]
    pub fn expand(&self, options: &ExpandOptions) -> Vec<DateTime<Tz>> {
        let mut out = Vec::new();

        for occ in self.occurrences() {
            let instant = occ.with_timezone(&Utc);
            if let Some(end) = options.range_end
                && instant >= end
            {
                break;
            }
            if let Some(start) = options.range_start
                && instant < start
            {
                continue;
            }
            out.push(occ);
            if out.len() >= options.max_instances {
                tracing::debug!(
                    max_instances = options.max_instances,
                    "Expansion reached instance cap"
                );
                break;
            }
        }

        out
    }
}

/// Resolves the UNTIL bound to a fixed instant in the evaluation zone.
fn until_instant(until: Until, tz: Tz) -> DateTime<Utc> {
    match until {
        Until::Utc(dt) => dt,
        Until::Local(naive) => resolve_civil(tz, naive).with_timezone(&Utc),
        Until::Date(date) => {
            // A bare date bounds inclusively through the end of the local day.
            let end_of_day = date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default());
            resolve_civil(tz, end_of_day).with_timezone(&Utc)
        }
    }
}

/// Iterator over the occurrences of a [`Recurrence`].
#[derive(Debug)]
pub struct Occurrences<'r> {
    recurrence: &'r Recurrence,
    tz: Tz,
    /// Civil series start in the evaluation zone.
    origin: NaiveDateTime,
    start_instant: DateTime<Utc>,
    until: Option<DateTime<Utc>>,
    /// Occurrences left under the count bound, if any.
    remaining: Option<u32>,
    /// Next period index to scan.
    period: u32,
    /// Resolved rule candidates waiting to be emitted.
    pending: VecDeque<DateTime<Tz>>,
    /// Sorted extra inclusion dates still to merge.
    rdates: VecDeque<DateTime<Utc>>,
    /// Consecutive periods that produced no candidate.
    idle_periods: u32,
    rule_done: bool,
}

impl Occurrences<'_> {
    /// Refills `pending` from successive periods until a candidate appears
    /// or the rule stream ends.
    fn fill_pending(&mut self) {
        while self.pending.is_empty() && !self.rule_done {
            let current = self.period;
            let Some(next) = self.period.checked_add(1) else {
                self.rule_done = true;
                return;
            };
            self.period = next;

            let candidates = period_candidates(&self.recurrence.rule, self.origin, current);

            let mut produced = false;
            for civil in candidates {
                let occ = resolve_civil(self.tz, civil);
                let instant = occ.with_timezone(&Utc);
                if instant < self.start_instant {
                    // Period 0 may cover days before the series start.
                    continue;
                }
                produced = true;
                if let Some(until) = self.until
                    && instant > until
                {
                    self.rule_done = true;
                    break;
                }
                self.pending.push_back(occ);
            }

            if produced {
                self.idle_periods = 0;
            } else {
                self.idle_periods += 1;
                if self.idle_periods >= self.recurrence.max_idle_periods {
                    tracing::warn!(
                        rule = %self.recurrence.rule,
                        scanned = self.idle_periods,
                        "Rule produced no occurrences within the idle-period guard, treating as exhausted"
                    );
                    self.rule_done = true;
                }
            }
        }
    }

    fn is_excluded(&self, instant: DateTime<Utc>) -> bool {
        self.recurrence.exdates.contains(&instant)
    }
}

impl Iterator for Occurrences<'_> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == Some(0) && !self.rule_done {
                self.rule_done = true;
                self.pending.clear();
            }

            if self.pending.is_empty() && !self.rule_done {
                self.fill_pending();
                continue;
            }

            let rule_head = self.pending.front().map(|occ| occ.with_timezone(&Utc));
            let rdate_head = self.rdates.front().copied();

            let take_rule = match (rule_head, rdate_head) {
                (Some(r), Some(d)) => r <= d,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return None,
            };

            if take_rule {
                let occ = self.pending.pop_front()?;
                let instant = occ.with_timezone(&Utc);
                // An excluded instance still consumes the count bound.
                self.remaining = self.remaining.map(|r| r.saturating_sub(1));
                if self.rdates.front() == Some(&instant) {
                    self.rdates.pop_front();
                }
                if self.is_excluded(instant) {
                    continue;
                }
                return Some(occ);
            }

            let instant = self.rdates.pop_front()?;
            if self.is_excluded(instant) {
                continue;
            }
            if let Some(until) = self.until
                && instant > until
            {
                continue;
            }
            return Some(instant.with_timezone(&self.tz));
        }
    }
}

impl std::iter::FusedIterator for Occurrences<'_> {}
