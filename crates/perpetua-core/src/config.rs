use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{DEFAULT_MAX_IDLE_PERIODS, DEFAULT_MAX_INSTANCES};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub recurrence: RecurrenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Limits applied by the recurrence engine.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// Cap on the number of occurrences a single expansion may produce.
    pub max_instances: usize,
    /// Consecutive empty periods scanned before an unbounded rule that can
    /// never match is treated as exhausted.
    pub max_idle_periods: u32,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            max_instances: DEFAULT_MAX_INSTANCES,
            max_idle_periods: DEFAULT_MAX_IDLE_PERIODS,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "debug")?
            .set_default(
                "recurrence.max_instances",
                u64::try_from(DEFAULT_MAX_INSTANCES)?,
            )?
            .set_default(
                "recurrence.max_idle_periods",
                u64::from(DEFAULT_MAX_IDLE_PERIODS),
            )?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Validates that the loaded limits are usable by the engine.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` for zero limits.
    pub fn validate(&self) -> CoreResult<()> {
        if self.recurrence.max_instances == 0 {
            return Err(CoreError::InvalidConfiguration(
                "recurrence.max_instances must be at least 1".to_string(),
            ));
        }
        if self.recurrence.max_idle_periods == 0 {
            return Err(CoreError::InvalidConfiguration(
                "recurrence.max_idle_periods must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads `.env` (if present) and then the full `Settings`.
///
/// ## Errors
/// Returns an error if configuration loading or validation fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();
    let settings = Settings::load()?;
    settings.validate()?;
    Ok(settings)
}
