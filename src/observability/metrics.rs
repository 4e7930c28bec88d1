//! Prometheus Metrics for the Position Service
//! Counters and latency for trade accumulation

use once_cell::sync::Lazy;
use prometheus::{Counter, CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder};
use std::sync::Mutex;

/// Global metrics registry
static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

pub struct Metrics {
    pub trades_applied_total: CounterVec,
    pub accumulations_total: CounterVec,
    pub accumulation_duration: HistogramVec,
    pub positions_computed_total: Counter,
}

static METRICS: Lazy<Mutex<Option<Metrics>>> = Lazy::new(|| Mutex::new(None));

/// Initialize metrics
pub fn init_metrics(service_name: &str) -> anyhow::Result<()> {
    let trades_applied_total = CounterVec::new(
        Opts::new("tradeops_trades_applied_total", "Trades applied to positions")
            .namespace("tradeops")
            .const_label("service", service_name),
        &["side"],
    )?;

    let accumulations_total = CounterVec::new(
        Opts::new("tradeops_accumulations_total", "Accumulation runs by outcome")
            .namespace("tradeops")
            .const_label("service", service_name),
        &["status"],
    )?;

    let accumulation_duration = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "tradeops_accumulation_duration_seconds",
            "Accumulation latency in seconds",
        )
        .namespace("tradeops")
        .const_label("service", service_name)
        .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["operation"],
    )?;

    let positions_computed_total = Counter::new(
        "tradeops_positions_computed_total",
        "Positions produced across all accumulation runs",
    )?;

    REGISTRY.register(Box::new(trades_applied_total.clone()))?;
    REGISTRY.register(Box::new(accumulations_total.clone()))?;
    REGISTRY.register(Box::new(accumulation_duration.clone()))?;
    REGISTRY.register(Box::new(positions_computed_total.clone()))?;

    let metrics = Metrics {
        trades_applied_total,
        accumulations_total,
        accumulation_duration,
        positions_computed_total,
    };

    let mut guard = METRICS.lock().unwrap();
    *guard = Some(metrics);

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Get metrics instance
pub fn get_metrics() -> std::sync::MutexGuard<'static, Option<Metrics>> {
    METRICS.lock().unwrap()
}

/// Encode metrics to Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap_or_default();
    String::from_utf8(buffer).unwrap_or_default()
}
