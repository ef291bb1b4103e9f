//! End-to-end cycles: a registry-driven pipeline forwarding attention output
//! into working memory and episodic memory, the way an orchestrator would.

use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use nodes::{AttentionController, EpisodicMemory, WorkingMemory};
use pipeline::{
    CheckpointStore, EventSink, HookError, LifecycleEvent, NodeContext, NodeName, NodeRegistry,
    RunId,
};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &LifecycleEvent) -> Result<(), HookError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingStore {
    snapshots: Mutex<Vec<(RunId, u64, Value)>>,
}

impl CheckpointStore for RecordingStore {
    fn checkpoint(
        &self,
        run_id: &RunId,
        cycle_idx: u64,
        memory_state: &Value,
    ) -> Result<(), HookError> {
        self.snapshots
            .lock()
            .unwrap()
            .push((*run_id, cycle_idx, memory_state.clone()));
        Ok(())
    }
}

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

fn name(s: &str) -> NodeName {
    NodeName::new(s).unwrap()
}

/// One cycle: score the candidates, push the winner into working memory,
/// record the decision as an episode. Returns the working-memory window.
fn run_cycle(
    registry: &mut NodeRegistry,
    ctx: &NodeContext,
    candidates: &[&str],
    scores: &[f64],
) -> Vec<Value> {
    let mut inputs = Map::new();
    inputs.insert("scores".into(), json!(scores));
    let attn_out = registry
        .get_mut(&name("attention"))
        .unwrap()
        .process(ctx, &inputs);
    let winner = attn_out["attn"].as_array().unwrap()[0].as_u64().unwrap() as usize;

    let mut inputs = Map::new();
    inputs.insert("item".into(), json!(candidates[winner]));
    let wm_out = registry
        .get_mut(&name("working_memory"))
        .unwrap()
        .process(ctx, &inputs);

    let mut inputs = Map::new();
    inputs.insert("append".into(), json!(true));
    inputs.insert("payload".into(), json!({"chosen": candidates[winner]}));
    inputs.insert("context".into(), json!({"entropy": attn_out["entropy"]}));
    registry
        .get_mut(&name("episodic"))
        .unwrap()
        .process(ctx, &inputs);

    wm_out["items"].as_array().unwrap().clone()
}

fn build_registry(
    events: Arc<dyn EventSink>,
    checkpoints: Arc<dyn CheckpointStore>,
) -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry
        .register(Box::new(AttentionController::new(name("attention"))))
        .unwrap();
    registry
        .register(Box::new(WorkingMemory::with_hooks(
            name("working_memory"),
            events.clone(),
            checkpoints.clone(),
        )))
        .unwrap();
    registry
        .register(Box::new(EpisodicMemory::with_hooks(
            name("episodic"),
            events,
            checkpoints,
        )))
        .unwrap();
    registry
}

#[test]
fn pipeline_runs_cycles_and_accumulates_state() {
    let events = Arc::new(RecordingSink::default());
    let store = Arc::new(RecordingStore::default());
    let mut registry = build_registry(events.clone(), store.clone());

    let run_id = RunId::new_random();
    let candidates = ["alpha", "beta", "gamma"];

    // Warm every node up the way an orchestrator would at session start.
    let ctx = NodeContext::new(run_id, 0, 7);
    for node_name in ["attention", "working_memory", "episodic"] {
        registry.get_mut(&name(node_name)).unwrap().warmup(&ctx);
    }

    // Capacity 2 forces evictions from the third cycle on.
    let mut opts = Map::new();
    opts.insert("capacity".into(), json!(2));
    registry
        .get_mut(&name("working_memory"))
        .unwrap()
        .configure(&opts);

    for cycle_idx in 0..5u64 {
        let ctx = NodeContext::new(run_id, cycle_idx, 7);
        // "beta" always scores highest.
        let window = run_cycle(&mut registry, &ctx, &candidates, &[0.5, 4.0, 1.0]);
        assert!(window.len() <= 2);
        assert_eq!(window.last().unwrap(), &json!("beta"));
    }

    let wm = registry.get(&name("working_memory")).unwrap();
    assert_eq!(wm.metrics().counter("evictions"), 3);

    let em = registry.get(&name("episodic")).unwrap();
    assert_eq!(em.metrics().counter("appends"), 5);

    let attn = registry.get(&name("attention")).unwrap();
    assert!(attn.metrics().gauge("entropy").unwrap() > 0.0);

    // Every emitted event carries the shared run/cycle identity.
    let emitted = events.events.lock().unwrap();
    assert!(!emitted.is_empty());
    assert!(emitted.iter().all(|e| e.run_id == run_id));

    // Checkpoints arrive from both stateful nodes, tagged with their cycle.
    let snapshots = store.snapshots.lock().unwrap();
    assert!(snapshots.iter().any(|(_, _, state)| state.get("capacity").is_some()));
    assert!(snapshots.iter().any(|(_, _, state)| state.get("episodes").is_some()));
    assert!(snapshots.iter().all(|(id, cycle, _)| *id == run_id && *cycle < 5));
}

#[test]
fn failing_collaborators_leave_node_state_untouched() {
    let run_id = RunId::new_random();
    let candidates = ["alpha", "beta"];
    let scores = [1.0, 3.0];

    let mut healthy = build_registry(
        Arc::new(RecordingSink::default()),
        Arc::new(RecordingStore::default()),
    );
    let mut broken = build_registry(Arc::new(FailingSink), Arc::new(FailingStore));

    let mut windows = (Vec::new(), Vec::new());
    for cycle_idx in 0..3u64 {
        let ctx = NodeContext::new(run_id, cycle_idx, 0);
        windows.0 = run_cycle(&mut healthy, &ctx, &candidates, &scores);
        windows.1 = run_cycle(&mut broken, &ctx, &candidates, &scores);
    }
    assert_eq!(windows.0, windows.1);

    for registry in [&healthy, &broken] {
        assert_eq!(
            registry
                .get(&name("episodic"))
                .unwrap()
                .metrics()
                .counter("appends"),
            3
        );
    }
}

#[test]
fn metrics_reads_are_free_of_side_effects() {
    let mut registry = build_registry(
        Arc::new(RecordingSink::default()),
        Arc::new(RecordingStore::default()),
    );
    let ctx = NodeContext::new(RunId::new_random(), 0, 0);
    run_cycle(&mut registry, &ctx, &["a", "b"], &[1.0, 2.0]);

    for node_name in ["attention", "working_memory", "episodic"] {
        let node = registry.get(&name(node_name)).unwrap();
        assert_eq!(node.metrics(), node.metrics());
    }
}
