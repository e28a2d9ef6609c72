//! Prometheus metrics for the CADOP search service.
//!
//! Exposes an HTTP endpoint for Prometheus scraping.

use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tracing::info;

use crate::http::bind_with_fallback;

/// Initialize the metrics system and return the Prometheus handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    describe_histogram!(
        "cadop_search_latency_ms",
        "Time taken for search requests in milliseconds"
    );
    describe_counter!(
        "cadop_search_total",
        "Total number of search requests answered"
    );
    describe_counter!(
        "cadop_search_errors_total",
        "Total number of searches that failed internally"
    );
    describe_counter!(
        "cadop_search_invalid_total",
        "Total number of searches rejected for a blank or malformed query"
    );

    PrometheusBuilder::new().install_recorder()
}

/// Record a search latency measurement.
pub fn record_search_latency(latency_ms: f64) {
    histogram!("cadop_search_latency_ms").record(latency_ms);
}

/// Increment the search count.
pub fn increment_search_count() {
    counter!("cadop_search_total").increment(1);
}

/// Increment the search error count.
pub fn increment_search_errors() {
    counter!("cadop_search_errors_total").increment(1);
}

/// Increment the rejected query count.
pub fn increment_invalid_queries() {
    counter!("cadop_search_invalid_total").increment(1);
}

/// Create an Axum router for the metrics HTTP endpoint.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
}

/// Serve the metrics endpoint on `addr` until the server fails.
pub async fn start_metrics_server(addr: SocketAddr, handle: PrometheusHandle) -> std::io::Result<()> {
    let listener = bind_with_fallback(addr).await?;

    info!(addr = %listener.local_addr()?, "Starting metrics server");

    axum::serve(listener, metrics_router(handle)).await
}
