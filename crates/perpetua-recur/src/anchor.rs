//! Anchor moment parsing.
//!
//! The anchor is the reference point the next due date is computed from.
//! It must identify an unambiguous instant: either the text carries a UTC
//! offset (RFC 3339), or a named zone is supplied alongside a wall-clock
//! time. A wall-clock time with no zone is rejected; a fixed offset alone is
//! accepted because it already pins the instant even though it cannot name
//! the zone's daylight-saving rules.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::expand::{ExpandError, ZoneResolver, resolve_civil};

/// Wall-clock text format accepted alongside a named zone.
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// ## Summary
/// Parses anchor text into a fixed instant.
///
/// Accepted forms:
/// - RFC 3339 with offset (`2026-03-09T12:00:00-05:00`, `...Z`); the zone
///   argument is not required.
/// - wall-clock (`2026-03-09T12:00:00`); requires `zone`, and resolves
///   under the engine's gap/fold policy.
///
/// ## Errors
///
/// Returns `ExpandError::InvalidAnchor` when the text is unparseable or is
/// a wall-clock time without a zone, and `ExpandError::UnknownZone` when
/// the named zone does not resolve.
pub fn parse_anchor(
    text: &str,
    zone: Option<&str>,
    resolver: &mut ZoneResolver,
) -> Result<DateTime<Utc>, ExpandError> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Ok(naive) = NaiveDateTime::parse_from_str(text, LOCAL_FORMAT) else {
        return Err(ExpandError::InvalidAnchor(text.to_string()));
    };

    let Some(zone_id) = zone else {
        return Err(ExpandError::InvalidAnchor(format!(
            "{text} carries no zone or offset"
        )));
    };

    let tz = resolver.resolve(zone_id)?;
    Ok(resolve_civil(tz, naive).with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rfc3339_anchor_needs_no_zone() {
        let mut resolver = ZoneResolver::new();
        let anchor = parse_anchor("2026-03-09T12:00:00-05:00", None, &mut resolver).unwrap();
        assert_eq!(anchor, Utc.with_ymd_and_hms(2026, 3, 9, 17, 0, 0).unwrap());
    }

    #[test]
    fn wall_clock_anchor_resolves_in_zone() {
        let mut resolver = ZoneResolver::new();
        let anchor = parse_anchor(
            "2026-03-09T12:00:00",
            Some("America/New_York"),
            &mut resolver,
        )
        .unwrap();
        assert_eq!(anchor, Utc.with_ymd_and_hms(2026, 3, 9, 17, 0, 0).unwrap());
    }

    #[test]
    fn wall_clock_anchor_without_zone_is_invalid() {
        let mut resolver = ZoneResolver::new();
        let err = parse_anchor("2026-03-09T12:00:00", None, &mut resolver).unwrap_err();
        assert!(matches!(err, ExpandError::InvalidAnchor(_)));
    }

    #[test]
    fn garbage_anchor_is_invalid() {
        let mut resolver = ZoneResolver::new();
        let err = parse_anchor("next tuesday", Some("UTC"), &mut resolver).unwrap_err();
        assert!(matches!(err, ExpandError::InvalidAnchor(_)));
    }

    #[test]
    fn unknown_zone_is_reported() {
        let mut resolver = ZoneResolver::new();
        let err = parse_anchor("2026-03-09T12:00:00", Some("Mars/Olympus"), &mut resolver)
            .unwrap_err();
        assert!(matches!(err, ExpandError::UnknownZone(_)));
    }
}
