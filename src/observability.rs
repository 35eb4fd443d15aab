//! Observability module for Agrocast.
//!
//! Provides logging initialization and prediction metrics.

use crate::config::ObservabilityConfig;
use crate::error::{AgrocastError, Result};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging.
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| AgrocastError::Internal(format!("Failed to init logging: {}", e)))?;
    } else {
        subscriber
            .with(fmt::layer())
            .try_init()
            .map_err(|e| AgrocastError::Internal(format!("Failed to init logging: {}", e)))?;
    }

    info!("Observability initialized");
    Ok(())
}

/// Install the Prometheus metrics recorder and return a render handle.
pub fn install_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AgrocastError::Internal(format!("Failed to install metrics recorder: {}", e)))?;

    register_metrics();
    Ok(handle)
}

/// Register standard metrics.
fn register_metrics() {
    counter!("agrocast_predictions_total").absolute(0);
}

/// Record a prediction attempt for a capability.
pub fn record_prediction(capability: &str, status: &str) {
    counter!(
        "agrocast_predictions_total",
        "capability" => capability.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
