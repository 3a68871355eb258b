//! # Telemetry
//!
//! Installs the global `tracing` subscriber.
//!
//! ## Filter Resolution
//! ```text
//! RUST_LOG set and valid? ──yes──► use RUST_LOG
//!        │ no
//!        ▼
//! logging.filter valid? ───yes──► use logging.filter
//!        │ no
//!        ▼
//! "info"
//! ```

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Filter used when neither `RUST_LOG` nor the config gives a usable one.
const FALLBACK_FILTER: &str = "info";

/// Builds the filter for `config`, letting `RUST_LOG` take precedence.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Initializes the tracing subscriber for logging.
///
/// Returns `true` if this call installed the global subscriber and `false`
/// if one was already set, so it is safe to call more than once.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_target(true);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        debug!(filter = %config.filter, format = %config.format, "Tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_does_not_panic() {
        let config = LoggingConfig::default();
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }

    #[test]
    fn test_build_filter_falls_back_on_bad_directive() {
        let config = LoggingConfig {
            filter: "storefront=loud".to_string(),
            format: LogFormat::Compact,
        };
        // Must not panic whatever RUST_LOG holds
        let _ = build_filter(&config);
    }
}
