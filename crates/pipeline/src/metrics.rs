//! Per-node instrumentation values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Instrumentation snapshot owned by a single node instance.
///
/// Mutated only by the owning node during `process`; exposed to callers as a
/// clone via [`crate::Node::metrics`], so nothing outside the node can corrupt
/// its counters. Counters and gauges carry whatever the node chooses to
/// publish for external health checks — the core imposes no schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    p95_ms: f64,
    rss_bytes: u64,
    counters: BTreeMap<String, u64>,
    gauges: BTreeMap<String, f64>,
}

impl NodeMetrics {
    /// Creates an empty metrics value.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mutation (owning node only) ---

    /// Adds `by` to the named counter, creating it at zero first if absent.
    pub fn incr_counter(&mut self, name: &str, by: u64) {
        *self.counters.entry(name.to_owned()).or_insert(0) += by;
    }

    /// Sets the named gauge, replacing any previous value.
    pub fn set_gauge(&mut self, name: &str, value: f64) {
        self.gauges.insert(name.to_owned(), value);
    }

    /// Records the observed p95 call latency (milliseconds).
    pub fn set_p95_ms(&mut self, value: f64) {
        self.p95_ms = value;
    }

    /// Records the node's self-estimated resident set size (bytes).
    pub fn set_rss_bytes(&mut self, value: u64) {
        self.rss_bytes = value;
    }

    // --- Query ---

    /// Returns the named counter, or 0 if it has never been incremented.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Returns the named gauge, or `None` if it has never been set.
    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.gauges.get(name).copied()
    }

    /// Observed p95 call latency (milliseconds).
    pub fn p95_ms(&self) -> f64 {
        self.p95_ms
    }

    /// Self-estimated resident set size (bytes).
    pub fn rss_bytes(&self) -> u64 {
        self.rss_bytes
    }

    /// All counters, keyed by name.
    pub fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    /// All gauges, keyed by name.
    pub fn gauges(&self) -> &BTreeMap<String, f64> {
        &self.gauges
    }
}
