//! Recurring task templates.
//!
//! The integration surface the task-scheduling subsystem uses: a stored,
//! serializable description of a recurring task's schedule. Rule text and
//! zone stay in their textual form for storage; compilation validates both
//! and produces a [`Recurrence`] ready for evaluation.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::expand::{Recurrence, ZoneResolver};
use crate::parse::parse_rule;

/// A recurring task template as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    /// Recurrence rule text (`FREQ=...` form).
    pub rule: String,

    /// Series start instant.
    pub starts_at: DateTime<Utc>,

    /// IANA zone the schedule is evaluated in.
    pub zone: String,

    /// Instants excluded from the schedule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exdates: Vec<DateTime<Utc>>,

    /// Extra instants merged into the schedule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rdates: Vec<DateTime<Utc>>,
}

impl RecurringTemplate {
    /// Creates a template with no exclusion or inclusion dates.
    #[must_use]
    pub fn new(rule: impl Into<String>, starts_at: DateTime<Utc>, zone: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            starts_at,
            zone: zone.into(),
            exdates: Vec::new(),
            rdates: Vec::new(),
        }
    }

    /// ## Summary
    /// Validates the template and compiles it into a [`Recurrence`].
    ///
    /// ## Errors
    ///
    /// Returns a parse error for malformed rule text and an expansion error
    /// for an unknown zone.
    pub fn compile(&self, resolver: &mut ZoneResolver) -> EngineResult<Recurrence> {
        let rule = parse_rule(&self.rule)?;
        let tz: Tz = resolver.resolve(&self.zone)?;
        let start = self.starts_at.with_timezone(&tz);

        Ok(Recurrence::new(rule, start)
            .with_exdates(self.exdates.clone())
            .with_rdates(self.rdates.clone()))
    }

    /// ## Summary
    /// Computes when this template is next due, strictly after `after`.
    ///
    /// `Ok(None)` means the schedule is exhausted and the template will
    /// never materialize another task instance.
    ///
    /// ## Errors
    ///
    /// Returns a parse error for malformed rule text and an expansion error
    /// for an unknown zone.
    pub fn next_due(
        &self,
        after: DateTime<Utc>,
        resolver: &mut ZoneResolver,
    ) -> EngineResult<Option<DateTime<Tz>>> {
        let recurrence = self.compile(resolver)?;
        Ok(recurrence.next_after(&after))
    }
}
