use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// Builds the `EnvFilter` for a run: `RUST_LOG` wins if set, otherwise the
/// configured level, otherwise `info`.
pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
