//! Prometheus metrics for the registry node.
//!
//! All metrics follow the naming convention: `registry_<metric>_<unit>`
//!
//! - `registry_operations_total{operation,outcome}`: invocations by result,
//!   where `outcome` is `ok` or an error kind label
//! - `registry_access_denied_total{operation,reason}`: RBAC rejections
//! - `registry_operation_duration_seconds{operation}`: invocation latency

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::time::Instant;

use crate::TelemetryError;

/// `outcome` label for successful invocations.
pub const OUTCOME_OK: &str = "ok";

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Invocations by operation and outcome
    pub static ref OPERATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("registry_operations_total", "Contract invocations by operation and outcome"),
        &["operation", "outcome"]
    ).expect("metric creation failed");

    /// Access denials by operation and reason
    pub static ref ACCESS_DENIED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("registry_access_denied_total", "RBAC rejections by operation and reason"),
        &["operation", "reason"]  // reason: no_role_attribute/role_not_allowed
    ).expect("metric creation failed");

    /// Invocation latency
    pub static ref OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "registry_operation_duration_seconds",
            "Time spent executing a contract invocation"
        ).buckets(exponential_buckets(0.00005, 2.0, 14).expect("valid bucket layout")),
        &["operation"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(OPERATIONS_TOTAL.clone()),
        Box::new(ACCESS_DENIED_TOTAL.clone()),
        Box::new(OPERATION_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Count one finished invocation.
pub fn record_outcome(operation: &str, outcome: &str) {
    OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Count one RBAC rejection.
pub fn record_access_denied(operation: &str, reason: &str) {
    ACCESS_DENIED_TOTAL
        .with_label_values(&[operation, reason])
        .inc();
}

/// Timer guard for automatic latency observation.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    /// Start timing `operation`. Observation happens on drop.
    pub fn start(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        OPERATION_DURATION
            .with_label_values(&[self.operation.as_str()])
            .observe(self.start.elapsed().as_secs_f64());
    }
}
