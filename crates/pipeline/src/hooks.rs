//! Injected boundaries to external collaborators.
//!
//! Lifecycle events and checkpoints are the only outward edges of the core.
//! Both are modelled as port traits injected at node construction rather than
//! module-level globals, so the core stays side-effect-free and independently
//! testable. Delivery is best-effort: nodes route every call through
//! [`emit_best_effort`] / [`checkpoint_best_effort`], which log a failure at
//! `warn` and return — a broken collaborator can never mutate or abort a
//! node's own in-memory state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{HookError, NodeName, RunId};

// ---------------------------------------------------------------------------
// Lifecycle events
// ---------------------------------------------------------------------------

/// A best-effort lifecycle notification emitted by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Name of the emitting node.
    pub node: NodeName,
    /// Run the emitting cycle belongs to.
    pub run_id: RunId,
    /// Cycle index at which the event occurred.
    pub cycle_idx: u64,
    /// Node-specific event payload; opaque to the core.
    pub payload: Value,
}

/// Receives lifecycle events from nodes.
///
/// Real implementations (message bus, audit log) live outside this core and
/// provide at-least-best-effort delivery; the core never depends on a
/// delivery succeeding.
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: &LifecycleEvent) -> Result<(), HookError>;
}

/// [`EventSink`] that discards every event. The default wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: &LifecycleEvent) -> Result<(), HookError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Checkpoints
// ---------------------------------------------------------------------------

/// Persists node state snapshots for restart recovery.
///
/// `memory_state` must contain enough to fully reconstruct the node's private
/// data. The store is expected to upsert: calling it twice with the same
/// `(run_id, cycle_idx)` is safe and the second write wins. That expectation
/// sits with the collaborator; the core does not enforce it.
pub trait CheckpointStore: Send + Sync {
    /// Persists one snapshot.
    fn checkpoint(
        &self,
        run_id: &RunId,
        cycle_idx: u64,
        memory_state: &Value,
    ) -> Result<(), HookError>;
}

/// [`CheckpointStore`] that discards every snapshot. The default wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCheckpointStore;

impl CheckpointStore for NullCheckpointStore {
    fn checkpoint(
        &self,
        _run_id: &RunId,
        _cycle_idx: u64,
        _memory_state: &Value,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fire-and-forget wrappers
// ---------------------------------------------------------------------------

/// Emits an event, logging and swallowing any delivery failure.
pub fn emit_best_effort(sink: &dyn EventSink, event: &LifecycleEvent) {
    if let Err(err) = sink.emit(event) {
        warn!(node = %event.node, cycle_idx = event.cycle_idx, %err, "lifecycle event dropped");
    }
}

/// Persists a snapshot, logging and swallowing any persistence failure.
pub fn checkpoint_best_effort(
    store: &dyn CheckpointStore,
    run_id: &RunId,
    cycle_idx: u64,
    memory_state: &Value,
) {
    if let Err(err) = store.checkpoint(run_id, cycle_idx, memory_state) {
        warn!(%run_id, cycle_idx, %err, "checkpoint dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingSink;

    impl EventSink for FailingSink {
        fn emit(&self, _event: &LifecycleEvent) -> Result<(), HookError> {
            Err(HookError::DeliveryFailed {
                reason: "bus offline".into(),
            })
        }
    }

    struct FailingStore;

    impl CheckpointStore for FailingStore {
        fn checkpoint(
            &self,
            _run_id: &RunId,
            _cycle_idx: u64,
            _memory_state: &Value,
        ) -> Result<(), HookError> {
            Err(HookError::PersistFailed {
                reason: "disk full".into(),
            })
        }
    }

    fn event() -> LifecycleEvent {
        LifecycleEvent {
            node: NodeName::new("wm").unwrap(),
            run_id: RunId::new_random(),
            cycle_idx: 0,
            payload: json!({"kind": "evicted"}),
        }
    }

    #[test]
    fn null_sinks_accept_everything() {
        assert!(NullEventSink.emit(&event()).is_ok());
        assert!(NullCheckpointStore
            .checkpoint(&RunId::new_random(), 7, &json!({}))
            .is_ok());
    }

    #[test]
    fn best_effort_wrappers_swallow_failures() {
        // Must not panic or propagate.
        emit_best_effort(&FailingSink, &event());
        checkpoint_best_effort(&FailingStore, &RunId::new_random(), 1, &json!({"n": 1}));
    }
}
