//! Tracing bootstrap and per-route execution records

use std::time::Duration;

use rallypoint_domain::LoggingConfig;
use tracing::{info, warn};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`. Calling this twice is harmless; the
/// second install is ignored.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if result.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of one route execution with structured fields.
///
/// `operation` is a stable identifier such as `"availability::sync"`;
/// `error_label` comes from [`rallypoint_domain::SyncError::label`].
#[inline]
pub fn log_operation(operation: &str, elapsed: Duration, error_label: Option<&'static str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error_label {
        None => info!(operation, duration_ms, success = true, "operation_execution_success"),
        Some(error) => {
            warn!(operation, duration_ms, success = false, error, "operation_execution_failure");
        }
    }
}
