//! Bounded recency store.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use pipeline::{
    checkpoint_best_effort, emit_best_effort, CheckpointStore, EventSink, LifecycleEvent, Node,
    NodeContext, NodeInputs, NodeMetrics, NodeName, NodeOptions, NodeOutputs, NullCheckpointStore,
    NullEventSink,
};

use crate::options::as_usize;

/// Window bound applied when `configure` has not set one.
pub const DEFAULT_CAPACITY: usize = 7;

/// Holds the most recent items a pipeline has produced, bounded by capacity.
///
/// Items are opaque `serde_json::Value`s; the node assumes no internal
/// structure. Eviction is FIFO and lazy: shrinking `capacity` below the
/// current length does not truncate immediately — each subsequent push
/// removes at most one oldest item, so an oversized window is corrected one
/// eviction per `process` call.
pub struct WorkingMemory {
    name: NodeName,
    capacity: usize,
    items: VecDeque<Value>,
    metrics: NodeMetrics,
    events: Arc<dyn EventSink>,
    checkpoints: Arc<dyn CheckpointStore>,
}

impl WorkingMemory {
    /// Creates a working-memory node with default capacity and no-op hooks.
    pub fn new(name: NodeName) -> Self {
        Self::with_hooks(name, Arc::new(NullEventSink), Arc::new(NullCheckpointStore))
    }

    /// Creates a working-memory node wired to the given collaborators.
    pub fn with_hooks(
        name: NodeName,
        events: Arc<dyn EventSink>,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            name,
            capacity: DEFAULT_CAPACITY,
            items: VecDeque::new(),
            metrics: NodeMetrics::new(),
            events,
            checkpoints,
        }
    }

    /// Current window bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current window length.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the window holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn window(&self) -> Value {
        Value::Array(self.items.iter().cloned().collect())
    }

    /// Snapshot sufficient to reconstruct this node after a restart.
    fn state_snapshot(&self) -> Value {
        json!({
            "capacity": self.capacity,
            "items": self.window(),
        })
    }
}

impl Node for WorkingMemory {
    fn name(&self) -> &NodeName {
        &self.name
    }

    /// Recognised keys: `capacity` (integer, floor 1).
    ///
    /// Does not truncate existing items; the new bound applies on the next
    /// push.
    fn configure(&mut self, options: &NodeOptions) {
        if let Some(capacity) = options.get("capacity").and_then(as_usize) {
            self.capacity = capacity.max(1);
        }
    }

    fn warmup(&mut self, _ctx: &NodeContext) {
        self.items.clear();
    }

    /// With an `item` input, appends it and evicts at most one oldest item if
    /// the window now exceeds capacity. Without one, a pure read. Returns the
    /// full current window under `items` as a copy.
    fn process(&mut self, ctx: &NodeContext, inputs: &NodeInputs) -> NodeOutputs {
        if let Some(item) = inputs.get("item") {
            self.items.push_back(item.clone());
            if self.items.len() > self.capacity {
                self.items.pop_front();
                self.metrics.incr_counter("evictions", 1);
                debug!(
                    node = %self.name,
                    capacity = self.capacity,
                    cycle_idx = ctx.cycle_idx(),
                    "oldest item evicted"
                );
                emit_best_effort(
                    self.events.as_ref(),
                    &LifecycleEvent {
                        node: self.name.clone(),
                        run_id: *ctx.run_id(),
                        cycle_idx: ctx.cycle_idx(),
                        payload: json!({"kind": "evicted", "len": self.items.len()}),
                    },
                );
            }
            checkpoint_best_effort(
                self.checkpoints.as_ref(),
                ctx.run_id(),
                ctx.cycle_idx(),
                &self.state_snapshot(),
            );
        }

        let mut outputs = NodeOutputs::new();
        outputs.insert("items".into(), self.window());
        outputs
    }

    fn metrics(&self) -> NodeMetrics {
        self.metrics.clone()
    }
}
