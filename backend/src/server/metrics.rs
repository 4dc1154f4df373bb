//! Prometheus request metrics served at `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use prometheus::Registry;

const NAMESPACE: &str = "sqlegalize";
const ENDPOINT: &str = "/metrics";

/// Request metrics middleware backed by a dedicated registry.
///
/// Probe traffic is excluded so scrapes reflect API use only.
pub(crate) fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .registry(Registry::new())
        .endpoint(ENDPOINT)
        .exclude("/health/live")
        .exclude("/health/ready")
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics registration failed: {err}")))
}
