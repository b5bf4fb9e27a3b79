//! Prometheus metrics for scheduling-service.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Safe to call more than once.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Render metrics in Prometheus text format. Empty until `init_metrics` runs.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Count one call to an external provider.
pub fn record_provider_call(provider: &'static str, operation: &'static str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "provider_calls_total",
        "provider" => provider,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}
