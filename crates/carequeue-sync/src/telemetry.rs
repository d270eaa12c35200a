//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

use carequeue_core::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Initialize the carequeue logging system.
///
/// Reads `CAREQUEUE_LOG` for the filter, e.g. `CAREQUEUE_LOG=carequeue_sync=debug`,
/// and falls back to `config.log_filter` when unset or invalid.
///
/// Idempotent. If the host application already installed a global
/// subscriber, that subscriber is kept.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CAREQUEUE_LOG")
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

        let builder = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true);

        let installed = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already set; keeping it");
        }
    });
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    init_tracing(&ObservabilityConfig {
        log_filter: filter.to_string(),
        json: false,
    });
}
