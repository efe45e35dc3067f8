//! Prometheus metrics for train lookups.
//!
//! Without an installed recorder (e.g. inside Lambda) every call here is a no-op.

use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tracing::debug;

// === Metric Name Constants ===

/// Completed checks (one per handler invocation) metric name.
pub const METRIC_CHECKS: &str = "train_checks_total";
/// Check duration metric name.
pub const METRIC_CHECK_LATENCY: &str = "train_check_latency_ms";
/// Per-train lookups metric name.
pub const METRIC_LOOKUPS: &str = "train_lookups_total";
/// Failed per-train lookups metric name.
pub const METRIC_LOOKUPS_FAILED: &str = "train_lookups_failed_total";
/// Per-train lookup latency metric name.
pub const METRIC_LOOKUP_LATENCY: &str = "train_lookup_latency_ms";

/// Interval between recorder upkeep runs.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Install the global Prometheus recorder, describe all metrics and start
/// the upkeep task. Must be called from within a tokio runtime.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    spawn_upkeep(handle.clone(), UPKEEP_INTERVAL);
    Ok(handle)
}

/// Periodically drain buffered histogram samples.
///
/// Without this, samples only drain on render, so an unscraped recorder grows
/// without bound.
pub fn spawn_upkeep(handle: PrometheusHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Register metric descriptions with the current recorder.
pub fn init_metrics() {
    describe_counter!(METRIC_CHECKS, "Total number of completed train checks");
    describe_histogram!(
        METRIC_CHECK_LATENCY,
        "Duration of a full train check in milliseconds"
    );
    describe_counter!(METRIC_LOOKUPS, "Total number of train status lookups");
    describe_counter!(
        METRIC_LOOKUPS_FAILED,
        "Total number of train status lookups reported as not available"
    );
    describe_histogram!(
        METRIC_LOOKUP_LATENCY,
        "Train status lookup latency in milliseconds"
    );

    debug!("Metrics initialized");
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Record a completed check.
pub fn record_check(start: Instant) {
    counter!(METRIC_CHECKS).increment(1);
    histogram!(METRIC_CHECK_LATENCY).record(elapsed_ms(start));
}

/// Record a single lookup's latency.
pub fn record_lookup_latency(start: Instant) {
    histogram!(METRIC_LOOKUP_LATENCY).record(elapsed_ms(start));
}

/// Count a lookup.
pub fn inc_lookups(success: bool) {
    counter!(METRIC_LOOKUPS).increment(1);
    if !success {
        counter!(METRIC_LOOKUPS_FAILED).increment(1);
    }
}
