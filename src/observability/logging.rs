//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing-subscriber` registry
//! - Pick the output format from config (pretty, compact, json)
//! - Configure log level from config, overridable by environment
//! - Write to stderr, stdout belongs to the CLI's output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, ObservabilityConfig};

/// Build the filter: `RUST_LOG` if set, the configured level otherwise.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global subscriber. Returns an error if one is already set.
pub fn init(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let fmt = match config.log_format {
        LogFormat::Pretty => fmt.pretty().boxed(),
        LogFormat::Compact => fmt.compact().boxed(),
        LogFormat::Json => fmt.json().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt)
        .try_init()
}
