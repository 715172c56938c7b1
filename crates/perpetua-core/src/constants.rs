//! Engine limit constants shared across crates.
//!
//! Fallback values used both by `Settings` defaults and by the recurrence
//! engine when no configuration is supplied.

/// Default cap on the number of occurrences a single expansion may produce.
pub const DEFAULT_MAX_INSTANCES: usize = 1000;

/// Default number of consecutive empty periods scanned before the engine
/// treats an unbounded rule as exhausted (e.g. `BYMONTHDAY=31;BYMONTH=2`,
/// which can never match).
pub const DEFAULT_MAX_IDLE_PERIODS: u32 = 1000;
