//! Tracing initialization for the backend binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// ## Summary
/// Installs the global tracing subscriber with a reloadable `EnvFilter`.
///
/// Starts at `debug` so configuration loading itself is visible, then
/// tightens the filter to the configured level once settings are available.
/// Invalid levels keep the startup filter and log a warning.
pub fn init_tracing(config: &LoggingConfig) {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    if let Ok(filter) = EnvFilter::try_new(config.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.level, "Invalid log level in config, keeping debug");
    }
}
