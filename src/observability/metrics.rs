//! Metrics collection and exposition.
//!
//! # Metrics
//! - `markit_conversions_total` (counter): conversions by source, outcome
//! - `markit_conversion_duration_seconds` (histogram): latency by source

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished conversion.
pub fn record_conversion(source: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("markit_conversions_total", "source" => source, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("markit_conversion_duration_seconds", "source" => source)
        .record(start.elapsed().as_secs_f64());
}
