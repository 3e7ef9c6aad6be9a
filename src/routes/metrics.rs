//! Prometheus metrics endpoint
//!
//! Exposes relay metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "prompt_relay_requests_total",
        "Total number of relay requests by outcome"
    );
    metrics::describe_histogram!(
        "prompt_relay_request_duration_seconds",
        "Relay request duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a finished relay request
pub fn record_request(outcome: &str, provider: &str, duration_secs: f64) {
    metrics::counter!(
        "prompt_relay_requests_total",
        "outcome" => outcome.to_string(),
        "provider" => provider.to_string()
    )
    .increment(1);
    metrics::histogram!("prompt_relay_request_duration_seconds", "provider" => provider.to_string())
        .record(duration_secs);
}
