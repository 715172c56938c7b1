//! Daylight-saving boundary tests.
//!
//! America/New_York springs forward 2024-03-10 02:00 -> 03:00 and falls
//! back 2024-11-03 02:00 -> 01:00.

use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::expand::{Recurrence, resolve_civil};
use crate::parse::parse_rule;

fn new_york(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::DateTime<Tz> {
    resolve_civil(
        Tz::America__New_York,
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap(),
    )
}

#[test_log::test]
fn daily_rule_keeps_local_time_across_spring_forward() {
    // Anchored the day before the transition at noon: the next occurrence is
    // noon local the following day, with the UTC offset shifted from -05:00
    // to -04:00.
    let rule = parse_rule("FREQ=DAILY").expect("should parse");
    let start = new_york(2024, 3, 9, 12, 0);
    let recurrence = Recurrence::new(rule, start);

    let next = recurrence.next_after(&start).expect("should have next");

    assert_eq!(next.hour(), 12);
    assert_eq!(next.offset().to_string(), "EDT");
    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap()
    );
    // The day before was EST: noon was 17:00Z.
    assert_eq!(
        start.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 3, 9, 17, 0, 0).unwrap()
    );
}

#[test_log::test]
fn occurrence_in_gap_advances_to_first_valid_time() {
    // 02:30 does not exist on 2024-03-10; the occurrence lands on 03:00 EDT.
    let rule = parse_rule("FREQ=DAILY").expect("should parse");
    let start = new_york(2024, 3, 9, 2, 30);
    let recurrence = Recurrence::new(rule, start);

    let next = recurrence.next_after(&start).expect("should have next");

    assert_eq!(next.hour(), 3);
    assert_eq!(next.minute(), 0);
    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap()
    );
}

#[test_log::test]
fn ambiguous_fall_back_time_takes_earlier_instant() {
    // 01:30 occurs twice on 2024-11-03; the earlier reading (EDT, -04:00)
    // wins.
    let rule = parse_rule("FREQ=DAILY").expect("should parse");
    let start = new_york(2024, 11, 2, 1, 30);
    let recurrence = Recurrence::new(rule, start);

    let next = recurrence.next_after(&start).expect("should have next");

    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap()
    );
}

#[test_log::test]
fn anchor_zone_differs_from_evaluation_zone() {
    // An anchor expressed in London time is converted to an instant before
    // evaluation; the result is expressed in the recurrence's zone.
    let rule = parse_rule("FREQ=DAILY").expect("should parse");
    let start = new_york(2024, 3, 9, 12, 0);
    let recurrence = Recurrence::new(rule, start);

    let anchor = start.with_timezone(&Tz::Europe__London);
    let next = recurrence.next_after(&anchor).expect("should have next");

    assert_eq!(next, new_york(2024, 3, 10, 12, 0));
    assert_eq!(next.timezone(), Tz::America__New_York);
}

#[test_log::test]
fn rezoned_recurrence_evaluates_in_new_wall_clock() {
    // Re-expressing the series in Berlin keeps the start instant but walks
    // the pattern on Berlin's wall clock.
    let rule = parse_rule("FREQ=DAILY").expect("should parse");
    let start = new_york(2024, 3, 9, 12, 0);
    let recurrence = Recurrence::new(rule, start).in_zone(Tz::Europe__Berlin);

    let next = recurrence.next_after(&start).expect("should have next");

    assert_eq!(next.timezone(), Tz::Europe__Berlin);
    // 12:00 EST is 18:00 in Berlin; the pattern repeats at 18:00 CET, which
    // on 2024-03-10 is 17:00Z (Berlin transitions three weeks later).
    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2024, 3, 10, 17, 0, 0).unwrap()
    );
}
