//! Per-cycle execution context.
//!
//! A [`NodeContext`] is constructed once per cycle by the orchestrator and
//! passed by shared reference to every node invoked within that cycle, so all
//! of them observe identical field values. The core never mutates a context.

use serde::{Deserialize, Serialize};

use crate::RunId;

/// Advisory per-call latency budget applied when the orchestrator does not
/// override it.
pub const DEFAULT_LATENCY_BUDGET_MS: u64 = 20;

/// Advisory per-node memory budget applied when the orchestrator does not
/// override it.
pub const DEFAULT_MEMORY_BUDGET_BYTES: u64 = 1_000_000;

// ---------------------------------------------------------------------------

/// Immutable per-cycle value shared by every node invocation in one cycle.
///
/// The budgets are advisory only: nodes may self-report against them via
/// [`crate::NodeMetrics`], but nothing in the core aborts or cancels a call
/// because a budget was exceeded. Enforcement, if any, belongs to the
/// orchestrator wrapping the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContext {
    run_id: RunId,
    cycle_idx: u64,
    seed: u64,
    latency_budget_ms: u64,
    memory_budget_bytes: u64,
}

impl NodeContext {
    /// Creates a context for one cycle with default advisory budgets.
    pub fn new(run_id: RunId, cycle_idx: u64, seed: u64) -> Self {
        Self {
            run_id,
            cycle_idx,
            seed,
            latency_budget_ms: DEFAULT_LATENCY_BUDGET_MS,
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET_BYTES,
        }
    }

    /// Overrides the advisory latency budget (milliseconds).
    pub fn with_latency_budget_ms(mut self, budget: u64) -> Self {
        self.latency_budget_ms = budget;
        self
    }

    /// Overrides the advisory memory budget (bytes).
    pub fn with_memory_budget_bytes(mut self, budget: u64) -> Self {
        self.memory_budget_bytes = budget;
        self
    }

    /// Opaque session identifier this cycle belongs to.
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Monotonic cycle index within the run.
    pub fn cycle_idx(&self) -> u64 {
        self.cycle_idx
    }

    /// Seed for any randomised node behaviour within this cycle.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advisory latency budget for a single `process` call (milliseconds).
    pub fn latency_budget_ms(&self) -> u64 {
        self.latency_budget_ms
    }

    /// Advisory memory budget for a node's private state (bytes).
    pub fn memory_budget_bytes(&self) -> u64 {
        self.memory_budget_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_not_overridden() {
        let ctx = NodeContext::new(RunId::new_random(), 3, 42);
        assert_eq!(ctx.cycle_idx(), 3);
        assert_eq!(ctx.seed(), 42);
        assert_eq!(ctx.latency_budget_ms(), DEFAULT_LATENCY_BUDGET_MS);
        assert_eq!(ctx.memory_budget_bytes(), DEFAULT_MEMORY_BUDGET_BYTES);
    }

    #[test]
    fn budget_overrides_stick() {
        let ctx = NodeContext::new(RunId::new_random(), 0, 0)
            .with_latency_budget_ms(250)
            .with_memory_budget_bytes(64);
        assert_eq!(ctx.latency_budget_ms(), 250);
        assert_eq!(ctx.memory_budget_bytes(), 64);
    }
}
