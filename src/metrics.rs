//! Prometheus metrics helpers.
//!
//! Counters are recorded through the `metrics` facade. They are no-ops until
//! a recorder is installed with [`install_prometheus`].

use anyhow::{Context, Result};
use ::metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Record one store operation against a collection.
pub fn record_store_operation(collection: &'static str, operation: &'static str) {
    counter!(
        "brandhub_store_operations_total",
        "collection" => collection,
        "operation" => operation
    )
    .increment(1);
}

/// Record the outcome of a content generation request.
pub fn record_generation(outcome: &'static str) {
    counter!("brandhub_content_generations_total", "outcome" => outcome).increment(1);
}

/// Installs the global Prometheus recorder and returns a handle for rendering.
///
/// # Errors
///
/// Returns an error if a global recorder is already installed.
pub fn install_prometheus() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}
