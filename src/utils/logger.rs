use crate::config::LoggingSettings;
use crate::domain::ports::Diagnostics;
use std::time::Duration;
use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Installs the global subscriber described by the `[logging]` config
/// section. `RUST_LOG` still takes precedence over the configured level.
///
/// Fails if a global subscriber is already set.
pub fn init_from_settings(settings: &LoggingSettings) -> Result<(), TryInitError> {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if settings.json {
        tracing_subscriber::registry()
            .with(env_filter(settings))
            .with(layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter(settings))
            .with(layer.compact())
            .try_init()
    }
}

fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("farefind={}", settings.level)))
}

/// Default [`Diagnostics`] sink: forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn retrying(
        &self,
        url: &str,
        attempt: u32,
        delay: Duration,
        error: &(dyn std::error::Error + 'static),
    ) {
        tracing::warn!(
            "Query to {} failed on attempt {}, retrying in {:?}: {}",
            url,
            attempt,
            delay,
            error
        );
    }

    fn gave_up(&self, url: &str, attempts: u32, error: &(dyn std::error::Error + 'static)) {
        tracing::error!(
            "Gave up querying {} after {} attempts, last error was: {}",
            url,
            attempts,
            error
        );
    }

    fn currency_mismatch(&self, expected: &str, returned: &str, flight_number: &str) {
        tracing::warn!(
            "Requested fares in {} but flight {} was priced in {}",
            expected,
            flight_number,
            returned
        );
    }
}
