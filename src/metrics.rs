//! Exporter Operational Metrics
//!
//! Metrics about the exporter itself, as opposed to the sensor readings it
//! republishes. They are served on `/exporter/metrics` so that `/metrics` carries
//! nothing but the Nature Remo families.
//!
//! # Metrics
//!
//! - `natureremo_exporter_up` - 1 if the last refresh tick fetched at least one resource
//! - `natureremo_exporter_refresh_total` - Fetch attempts
//!   - Labels: resource, outcome (`success` / `failure`)
//! - `natureremo_exporter_last_success_timestamp_seconds` - Unix time of the last good fetch
//!   - Labels: resource
//! - `natureremo_exporter_snapshot_items` - Items held in the snapshot
//!   - Labels: resource

use prometheus::{Encoder, Gauge, GaugeVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics describing the health of the refresh loop
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Arc<Registry>,

    pub up: Arc<Gauge>,
    pub refresh_total: Arc<IntCounterVec>,
    pub last_success_timestamp_seconds: Arc<GaugeVec>,
    pub snapshot_items: Arc<IntGaugeVec>,
}

impl ExporterMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let up = Gauge::with_opts(
            Opts::new(
                "up",
                "Whether the last refresh reached the Nature Remo API (1=yes, 0=no)",
            )
            .namespace("natureremo_exporter"),
        )?;

        let refresh_total = IntCounterVec::new(
            Opts::new("refresh_total", "Fetch attempts against the Nature Remo API")
                .namespace("natureremo_exporter"),
            &["resource", "outcome"],
        )?;

        let last_success_timestamp_seconds = GaugeVec::new(
            Opts::new(
                "last_success_timestamp_seconds",
                "Unix timestamp of the last successful fetch",
            )
            .namespace("natureremo_exporter"),
            &["resource"],
        )?;

        let snapshot_items = IntGaugeVec::new(
            Opts::new(
                "snapshot_items",
                "Number of items held in the latest snapshot",
            )
            .namespace("natureremo_exporter"),
            &["resource"],
        )?;

        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(refresh_total.clone()))?;
        registry.register(Box::new(last_success_timestamp_seconds.clone()))?;
        registry.register(Box::new(snapshot_items.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            up: Arc::new(up),
            refresh_total: Arc::new(refresh_total),
            last_success_timestamp_seconds: Arc::new(last_success_timestamp_seconds),
            snapshot_items: Arc::new(snapshot_items),
        })
    }

    /// Record a successful fetch of `resource` holding `items` entries
    pub fn record_success(&self, resource: &str, items: usize) {
        self.refresh_total
            .with_label_values(&[resource, "success"])
            .inc();
        self.last_success_timestamp_seconds
            .with_label_values(&[resource])
            .set(chrono::Utc::now().timestamp() as f64);
        self.snapshot_items
            .with_label_values(&[resource])
            .set(items as i64);
    }

    pub fn record_failure(&self, resource: &str) {
        self.refresh_total
            .with_label_values(&[resource, "failure"])
            .inc();
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create exporter metrics")
    }
}
