//! Prometheus middleware construction for the `metrics` feature.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

/// Build the request metrics middleware serving `/metrics`.
///
/// # Errors
/// Returns [`std::io::Error`] if the Prometheus registry rejects the metrics.
pub fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("simplecrm")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("prometheus metrics registration failed: {e}")))
}
