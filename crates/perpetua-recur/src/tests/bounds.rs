//! Bound and anchor-ordering properties: COUNT, UNTIL, exhaustion, and the
//! strictly-after contract.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::expand::{ExpandOptions, Recurrence, resolve_civil};
use crate::parse::parse_rule;

fn new_york(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
    resolve_civil(
        Tz::America__New_York,
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap(),
    )
}

#[test]
fn next_after_never_at_or_before_anchor() {
    let rules = [
        "FREQ=DAILY",
        "FREQ=DAILY;INTERVAL=3",
        "FREQ=WEEKLY;BYDAY=MO,WE,FR",
        "FREQ=MONTHLY;BYMONTHDAY=1,15",
        "FREQ=MONTHLY;BYDAY=-1FR",
        "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=29",
    ];
    let start = new_york(2024, 1, 1, 9);

    for rule_text in rules {
        let rule = parse_rule(rule_text).expect("should parse");
        let recurrence = Recurrence::new(rule, start);

        let mut anchor = start.with_timezone(&Utc);
        for _ in 0..50 {
            let Some(next) = recurrence.next_after(&anchor) else {
                break;
            };
            let instant = next.with_timezone(&Utc);
            assert!(instant > anchor, "{rule_text}: {instant} <= {anchor}");
            anchor = instant;
        }
    }
}

#[test]
fn count_bounds_total_occurrences() {
    let rule = parse_rule("FREQ=DAILY;COUNT=5").expect("should parse");
    let recurrence = Recurrence::new(rule, new_york(2026, 1, 1, 9));

    assert_eq!(recurrence.occurrences().count(), 5);

    // Walking via next_after yields the same five, then exhaustion.
    let mut anchor = new_york(2025, 12, 31, 0).with_timezone(&Utc);
    let mut seen = 0;
    while let Some(next) = recurrence.next_after(&anchor) {
        anchor = next.with_timezone(&Utc);
        seen += 1;
        assert!(seen <= 5, "yielded more than COUNT occurrences");
    }
    assert_eq!(seen, 5);
}

#[test]
fn count_one_yields_single_occurrence_then_exhausts() {
    let rule = parse_rule("FREQ=DAILY;COUNT=1").expect("should parse");
    let occurrence = new_york(2026, 1, 1, 9);
    let recurrence = Recurrence::new(rule, occurrence);

    let before = new_york(2025, 12, 25, 0);
    let first = recurrence.next_after(&before).expect("first call yields");
    assert_eq!(first, occurrence);

    assert_eq!(recurrence.next_after(&first), None);
}

#[test]
fn until_is_inclusive_and_final() {
    // Bare-date UNTIL runs through the end of that local day.
    let rule = parse_rule("FREQ=DAILY;UNTIL=20260105").expect("should parse");
    let recurrence = Recurrence::new(rule, new_york(2026, 1, 1, 9));

    let occurrences: Vec<_> = recurrence.occurrences().collect();
    assert_eq!(occurrences.len(), 5);
    assert_eq!(occurrences[4], new_york(2026, 1, 5, 9));

    let until = new_york(2026, 1, 5, 23).with_timezone(&Utc);
    for occ in &occurrences {
        assert!(occ.with_timezone(&Utc) <= until);
    }
}

#[test]
fn until_utc_datetime_cuts_exactly() {
    // 14:00Z is 09:00 EST, so the occurrence on the cut day itself still
    // fits; nothing after it does.
    let rule = parse_rule("FREQ=DAILY;UNTIL=20260103T140000Z").expect("should parse");
    let recurrence = Recurrence::new(rule, new_york(2026, 1, 1, 9));

    let occurrences: Vec<_> = recurrence.occurrences().collect();
    assert_eq!(occurrences.len(), 3);
    assert_eq!(occurrences[2], new_york(2026, 1, 3, 9));
}

#[test]
fn weekly_anchored_tuesday_yields_following_wednesday() {
    let rule = parse_rule("FREQ=WEEKLY;BYDAY=MO,WE,FR").expect("should parse");
    // 2026-01-06 is a Tuesday.
    let recurrence = Recurrence::new(rule, new_york(2026, 1, 5, 9));

    let anchor = new_york(2026, 1, 6, 12);
    let next = recurrence.next_after(&anchor).expect("should have next");
    assert_eq!(next, new_york(2026, 1, 7, 9));
}

#[test]
fn expanding_a_bounded_rule_stops_at_the_bound() {
    let rule = parse_rule("FREQ=WEEKLY;COUNT=4").expect("should parse");
    let recurrence = Recurrence::new(rule, new_york(2026, 1, 5, 9));

    let options = ExpandOptions::default();
    let occurrences = recurrence.expand(&options);
    assert_eq!(occurrences.len(), 4);
}

#[test]
fn impossible_unbounded_rule_reports_exhaustion() {
    let rule = parse_rule("FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=30").expect("should parse");
    let recurrence =
        Recurrence::new(rule, new_york(2026, 1, 1, 9)).with_max_idle_periods(25);

    assert_eq!(recurrence.next_after(&new_york(2026, 1, 1, 9)), None);
}
