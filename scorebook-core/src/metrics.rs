//! Metrics collection for observability
//!
//! Each session owns its own Prometheus registry, so several sessions (and
//! tests) can coexist in one process.
//!
//! # Metrics
//!
//! - `scorebook_mutations_total` - Total number of applied ledger mutations
//! - `scorebook_undo_total` - Total number of successful undos
//! - `scorebook_persist_failures_total` - Failed writes of either file
//! - `scorebook_history_depth` - Current number of undo snapshots

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Applied mutations
    pub mutations_total: IntCounter,

    /// Successful undos
    pub undo_total: IntCounter,

    /// Failed file writes
    pub persist_failures_total: IntCounter,

    /// Undo snapshots held
    pub history_depth: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let mutations_total = IntCounter::new(
            "scorebook_mutations_total",
            "Total number of applied ledger mutations",
        )?;
        registry.register(Box::new(mutations_total.clone()))?;

        let undo_total = IntCounter::new("scorebook_undo_total", "Total number of successful undos")?;
        registry.register(Box::new(undo_total.clone()))?;

        let persist_failures_total = IntCounter::new(
            "scorebook_persist_failures_total",
            "Failed writes of the game state or history file",
        )?;
        registry.register(Box::new(persist_failures_total.clone()))?;

        let history_depth = IntGauge::new(
            "scorebook_history_depth",
            "Current number of undo snapshots",
        )?;
        registry.register(Box::new(history_depth.clone()))?;

        Ok(Self {
            mutations_total,
            undo_total,
            persist_failures_total,
            history_depth,
            registry,
        })
    }

    /// Record an applied mutation
    pub fn record_mutation(&self) {
        self.mutations_total.inc();
    }

    /// Record a successful undo
    pub fn record_undo(&self) {
        self.undo_total.inc();
    }

    /// Record a failed write
    pub fn record_persist_failure(&self) {
        self.persist_failures_total.inc();
    }

    /// Update the history depth gauge
    pub fn update_history_depth(&self, depth: usize) {
        self.history_depth.set(depth as i64);
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> crate::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| crate::Error::Other(e.to_string()))
    }
}
