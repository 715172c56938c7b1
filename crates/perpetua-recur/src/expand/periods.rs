//! Civil candidate generation, one frequency period at a time.
//!
//! A period is the interval-aligned day/week/month/year containing potential
//! occurrences: period `p` lies `p * interval` frequency units after the
//! series origin. Candidates are wall-clock date-times; instant resolution
//! and bound filtering happen in the occurrence iterator.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::rule::{Frequency, RecurrenceRule, Weekday, WeekdayNum};

/// Generates the sorted, de-duplicated candidates of one period, with
/// BYSETPOS applied. Candidates carry the origin's time of day.
pub(crate) fn period_candidates(
    rule: &RecurrenceRule,
    origin: NaiveDateTime,
    period: u32,
) -> Vec<NaiveDateTime> {
    let steps = u64::from(period) * u64::from(rule.interval);
    let mut dates = match rule.freq {
        Frequency::Daily => daily_dates(rule, origin.date(), steps),
        Frequency::Weekly => weekly_dates(rule, origin.date(), steps),
        Frequency::Monthly => monthly_dates(rule, origin.date(), steps),
        Frequency::Yearly => yearly_dates(rule, origin.date(), steps),
    };
    dates.sort_unstable();
    dates.dedup();

    apply_setpos(&rule.by_setpos, dates)
        .into_iter()
        .map(|d| d.and_time(origin.time()))
        .collect()
}

/// The single day of a daily period, if it passes the BY-rule filters.
fn daily_dates(rule: &RecurrenceRule, origin_date: NaiveDate, steps: u64) -> Vec<NaiveDate> {
    let Some(date) = origin_date.checked_add_days(Days::new(steps)) else {
        return Vec::new();
    };
    if month_allowed(&rule.by_month, date)
        && monthday_allowed(&rule.by_monthday, date)
        && weekday_allowed(&rule.by_day, date)
    {
        vec![date]
    } else {
        Vec::new()
    }
}

/// Candidates within a weekly period, aligned on the rule's week start.
fn weekly_dates(rule: &RecurrenceRule, origin_date: NaiveDate, step_weeks: u64) -> Vec<NaiveDate> {
    let origin_weekday = Weekday::from_chrono(origin_date.weekday());
    let alignment = u64::from(origin_weekday.num_days_from(rule.wkst));

    let Some(week_start) = origin_date
        .checked_sub_days(Days::new(alignment))
        .and_then(|d| d.checked_add_days(Days::new(step_weeks.saturating_mul(7))))
    else {
        return Vec::new();
    };

    let targets: Vec<Weekday> = if rule.by_day.is_empty() {
        vec![origin_weekday]
    } else {
        rule.by_day.iter().map(|entry| entry.weekday).collect()
    };

    targets
        .into_iter()
        .filter_map(|wd| {
            week_start.checked_add_days(Days::new(u64::from(wd.num_days_from(rule.wkst))))
        })
        .filter(|d| month_allowed(&rule.by_month, *d))
        .collect()
}

/// Candidates within a monthly period.
///
/// BYMONTHDAY expands, BYDAY expands when BYMONTHDAY is absent and limits
/// otherwise; a bare rule takes the origin's day of month, skipping months
/// that lack it.
fn monthly_dates(rule: &RecurrenceRule, origin_date: NaiveDate, steps: u64) -> Vec<NaiveDate> {
    let Some((year, month)) = add_months(origin_date.year(), origin_date.month(), steps) else {
        return Vec::new();
    };

    if !rule.by_month.is_empty() && !rule.by_month.iter().any(|&m| u32::from(m) == month) {
        return Vec::new();
    }

    let mut dates = if !rule.by_monthday.is_empty() {
        monthday_dates(year, month, &rule.by_monthday)
    } else if !rule.by_day.is_empty() {
        byday_dates_in_month(year, month, &rule.by_day)
    } else {
        NaiveDate::from_ymd_opt(year, month, origin_date.day())
            .into_iter()
            .collect()
    };

    if !rule.by_monthday.is_empty() && !rule.by_day.is_empty() {
        let allowed = byday_dates_in_month(year, month, &rule.by_day);
        dates.retain(|d| allowed.contains(d));
    }

    dates
}

/// Candidates within a yearly period.
fn yearly_dates(rule: &RecurrenceRule, origin_date: NaiveDate, steps: u64) -> Vec<NaiveDate> {
    let Some(year) = i64::try_from(steps)
        .ok()
        .and_then(|s| i64::from(origin_date.year()).checked_add(s))
        .and_then(|y| i32::try_from(y).ok())
    else {
        return Vec::new();
    };

    let mut dates = if rule.by_month.is_empty() && rule.by_monthday.is_empty() && !rule.by_day.is_empty()
    {
        // BYDAY alone: ordinals are relative to the year.
        byday_dates_in_year(year, &rule.by_day)
    } else {
        let months: Vec<u32> = if rule.by_month.is_empty() {
            if rule.by_monthday.is_empty() {
                vec![origin_date.month()]
            } else {
                (1..=12).collect()
            }
        } else {
            rule.by_month.iter().map(|&m| u32::from(m)).collect()
        };

        let mut out = Vec::new();
        for month in months {
            if !rule.by_monthday.is_empty() {
                out.extend(monthday_dates(year, month, &rule.by_monthday));
            } else if !rule.by_day.is_empty() {
                out.extend(byday_dates_in_month(year, month, &rule.by_day));
            } else {
                // Feb 29 outside leap years yields nothing for the period.
                out.extend(NaiveDate::from_ymd_opt(year, month, origin_date.day()));
            }
        }
        out
    };

    if !rule.by_monthday.is_empty() && !rule.by_day.is_empty() {
        dates.retain(|d| byday_dates_in_month(d.year(), d.month(), &rule.by_day).contains(d));
    }

    dates
}

/// Applies BYSETPOS to the sorted candidate set of one period.
fn apply_setpos(by_setpos: &[i16], dates: Vec<NaiveDate>) -> Vec<NaiveDate> {
    if by_setpos.is_empty() {
        return dates;
    }

    let len = i64::try_from(dates.len()).unwrap_or(i64::MAX);
    let mut picked: Vec<NaiveDate> = by_setpos
        .iter()
        .filter_map(|&pos| {
            let idx = if pos > 0 {
                i64::from(pos) - 1
            } else {
                len + i64::from(pos)
            };
            usize::try_from(idx).ok().and_then(|i| dates.get(i)).copied()
        })
        .collect();
    picked.sort_unstable();
    picked.dedup();
    picked
}

/// Resolves BYMONTHDAY entries within a month (negative values count from
/// the end of the month).
fn monthday_dates(year: i32, month: u32, by_monthday: &[i8]) -> Vec<NaiveDate> {
    let length = i64::from(days_in_month(year, month));
    by_monthday
        .iter()
        .filter_map(|&md| {
            let day = if md > 0 {
                i64::from(md)
            } else {
                length + i64::from(md) + 1
            };
            u32::try_from(day)
                .ok()
                .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
        })
        .collect()
}

/// Expands BYDAY entries within a month, honoring ordinals.
fn byday_dates_in_month(year: i32, month: u32, by_day: &[WeekdayNum]) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    for entry in by_day {
        let matches = weekday_dates_in_month(year, month, entry.weekday);
        match entry.ordinal {
            None => out.extend(matches),
            Some(n) => out.extend(select_ordinal(&matches, n)),
        }
    }
    out
}

/// Expands BYDAY entries within a year, honoring ordinals.
fn byday_dates_in_year(year: i32, by_day: &[WeekdayNum]) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    for entry in by_day {
        let matches: Vec<NaiveDate> = (1..=12)
            .flat_map(|m| weekday_dates_in_month(year, m, entry.weekday))
            .collect();
        match entry.ordinal {
            None => out.extend(matches),
            Some(n) => out.extend(select_ordinal(&matches, n)),
        }
    }
    out
}

/// All dates of a month falling on the given weekday, in order.
fn weekday_dates_in_month(year: i32, month: u32, weekday: Weekday) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .filter(|d| d.weekday() == weekday.to_chrono())
        .collect()
}

/// Picks the nth entry of an ordered match list (negative from the end).
fn select_ordinal(matches: &[NaiveDate], ordinal: i8) -> Option<NaiveDate> {
    let idx = if ordinal > 0 {
        i64::from(ordinal) - 1
    } else {
        i64::try_from(matches.len()).unwrap_or(i64::MAX) + i64::from(ordinal)
    };
    usize::try_from(idx).ok().and_then(|i| matches.get(i)).copied()
}

fn month_allowed(by_month: &[u8], date: NaiveDate) -> bool {
    by_month.is_empty() || by_month.iter().any(|&m| u32::from(m) == date.month())
}

fn monthday_allowed(by_monthday: &[i8], date: NaiveDate) -> bool {
    if by_monthday.is_empty() {
        return true;
    }
    let length = i64::from(days_in_month(date.year(), date.month()));
    let day = i64::from(date.day());
    by_monthday.iter().any(|&md| {
        if md > 0 {
            i64::from(md) == day
        } else {
            length + i64::from(md) + 1 == day
        }
    })
}

fn weekday_allowed(by_day: &[WeekdayNum], date: NaiveDate) -> bool {
    by_day.is_empty()
        || by_day
            .iter()
            .any(|entry| entry.weekday.to_chrono() == date.weekday())
}

/// Advances a civil (year, month) by `steps` whole months, returning the
/// resulting year and 1-based month, or `None` on calendar overflow.
fn add_months(year: i32, month: u32, steps: u64) -> Option<(i32, u32)> {
    let months_from_zero = i64::from(year)
        .checked_mul(12)?
        .checked_add(i64::from(month) - 1)?
        .checked_add(i64::try_from(steps).ok()?)?;
    let new_year = i32::try_from(months_from_zero.div_euclid(12)).ok()?;
    let new_month = u32::try_from(months_from_zero.rem_euclid(12)).ok()? + 1;
    Some((new_year, new_month))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}
