//! # Registry Telemetry
//!
//! Logging and metrics for the identity registry node.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter`, human or JSON
//!   output on stderr
//! - **Metrics**: Prometheus counters and a latency histogram, encoded in the
//!   text exposition format
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REGISTRY_SERVICE_NAME` | `registry-node` | Service name in logs |
//! | `REGISTRY_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` takes precedence) |
//! | `REGISTRY_JSON_LOGS` | `false` | JSON log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::{build_filter, init_logging};
pub use metrics::{
    encode_metrics, record_access_denied, record_outcome, register_metrics, OperationTimer,
    ACCESS_DENIED_TOTAL, OPERATIONS_TOTAL, OPERATION_DURATION, OUTCOME_OK,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard to be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so that nothing is lost if logging init fails
    register_metrics()?;
    init_logging(&config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Dumps the metric exposition on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service name the guard was created for.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        match encode_metrics() {
            Ok(text) => tracing::info!(
                service = %self.service_name,
                metrics = %text,
                "Shutting down telemetry"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to encode metrics at shutdown"),
        }
    }
}
