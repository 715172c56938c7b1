//! Occurrence expansion.
//!
//! Couples a parsed [`crate::rule::RecurrenceRule`] with a zoned series
//! start and computes due instants: the next occurrence after an anchor, or
//! all occurrences within a range.

mod error;
mod occurrences;
mod periods;
mod timezone;

pub use error::ExpandError;
pub use occurrences::{Occurrences, Recurrence};
pub use timezone::{ZoneResolver, resolve_civil};

use chrono::{DateTime, Utc};
use perpetua_core::config::RecurrenceConfig;
use perpetua_core::constants::DEFAULT_MAX_INSTANCES;

/// Options for range expansion.
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// Start of time range filter (inclusive).
    pub range_start: Option<DateTime<Utc>>,

    /// End of time range filter (exclusive).
    pub range_end: Option<DateTime<Utc>>,

    /// Maximum number of occurrences to return.
    pub max_instances: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            range_start: None,
            range_end: None,
            max_instances: DEFAULT_MAX_INSTANCES,
        }
    }
}

impl ExpandOptions {
    /// Creates expansion options with a half-open time range.
    #[must_use]
    pub fn with_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            range_start: Some(start),
            range_end: Some(end),
            ..Self::default()
        }
    }

    /// Sets the maximum number of instances.
    #[must_use]
    pub fn with_max_instances(mut self, max: usize) -> Self {
        self.max_instances = max;
        self
    }

    /// Creates options whose limits come from configuration.
    #[must_use]
    pub fn from_config(config: &RecurrenceConfig) -> Self {
        Self {
            max_instances: config.max_instances,
            ..Self::default()
        }
    }
}
