//! Zone resolution and civil-to-instant conversion.
//!
//! Zone identifiers arrive from clients and stored templates, so resolution
//! is cached and tolerant of the vendor prefixes some calendar clients emit.
//! Civil times are resolved under a fixed daylight-saving policy: times that
//! fall in a spring-forward gap advance to the first valid local time after
//! the gap, and ambiguous fall-back times take the earlier instant.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{LocalResult, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

use super::error::ExpandError;

/// Upper bound on the forward probe when a civil time falls in a gap.
/// No real zone transition skips more than two days (Pacific/Apia skipped
/// one calendar day in 2011).
const GAP_PROBE_LIMIT_MINUTES: u32 = 48 * 60;

/// Resolver for time-zone identifiers.
///
/// Maintains a cache of resolved zones. The resolver is the injected zone
/// database dependency of the engine; tests construct their own instead of
/// relying on ambient process state.
#[derive(Debug, Default)]
pub struct ZoneResolver {
    /// Cache of resolved IANA zones by identifier.
    cache: HashMap<String, Tz>,
}

impl ZoneResolver {
    /// Creates a new zone resolver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// ## Summary
    /// Resolves a zone identifier to a `chrono_tz::Tz`.
    ///
    /// Common vendor-prefixed identifiers are normalized to their IANA
    /// equivalents before lookup.
    ///
    /// ## Errors
    ///
    /// Returns `ExpandError::UnknownZone` if the identifier cannot be
    /// resolved.
    ///
    /// ## Side Effects
    ///
    /// Caches successful resolutions to avoid repeated parsing.
    pub fn resolve(&mut self, zone_id: &str) -> Result<Tz, ExpandError> {
        if let Some(tz) = self.cache.get(zone_id) {
            return Ok(*tz);
        }

        let normalized = normalize_zone_id(zone_id);

        let tz = Tz::from_str(normalized)
            .map_err(|_e| ExpandError::UnknownZone(zone_id.to_string()))?;

        self.cache.insert(zone_id.to_string(), tz);

        Ok(tz)
    }
}

/// Normalizes vendor-prefixed zone identifiers to IANA names.
///
/// Some calendar clients store identifiers like
/// `/mozilla.org/20070129_1/America/New_York`.
fn normalize_zone_id(zone_id: &str) -> &str {
    let stripped = zone_id
        .strip_prefix("/mozilla.org/")
        .or_else(|| zone_id.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(zone_id);

    // The Mozilla form carries a version segment before the IANA name.
    if let Some(slash) = stripped.find('/')
        && stripped != zone_id
        && stripped[..slash].chars().all(|c| c.is_ascii_digit() || c == '_')
    {
        return &stripped[slash + 1..];
    }

    stripped
}

/// ## Summary
/// Resolves a civil (wall-clock) date-time to an instant in `tz`.
///
/// Applies the engine's daylight-saving policy:
/// - unambiguous times convert directly;
/// - ambiguous times (fall-back overlap) take the earlier instant;
/// - non-existent times (spring-forward gap) advance to the first valid
///   local minute after the gap.
#[must_use]
pub fn resolve_civil(tz: Tz, civil: NaiveDateTime) -> chrono::DateTime<Tz> {
    match tz.from_local_datetime(&civil) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _later) => earlier,
        LocalResult::None => skip_gap(tz, civil),
    }
}

/// Probes forward minute by minute for the first local time after a gap.
///
/// Seconds are dropped so the result lands on the gap boundary itself
/// rather than partway into the first valid minute.
fn skip_gap(tz: Tz, civil: NaiveDateTime) -> chrono::DateTime<Tz> {
    let mut probe = civil.with_second(0).unwrap_or(civil);

    for _ in 0..GAP_PROBE_LIMIT_MINUTES {
        probe = match probe.checked_add_signed(chrono::Duration::minutes(1)) {
            Some(next) => next,
            None => break,
        };
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earlier, _later) => return earlier,
            LocalResult::None => {}
        }
    }

    // Unreachable with real zone data; interpret as UTC rather than panic.
    tracing::warn!(%civil, zone = %tz, "Gap probe exhausted, falling back to UTC reading");
    tz.from_utc_datetime(&civil)
}
