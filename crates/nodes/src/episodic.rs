//! Append-only event log.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use pipeline::{
    checkpoint_best_effort, emit_best_effort, CheckpointStore, EventSink, LifecycleEvent, Node,
    NodeContext, NodeInputs, NodeMetrics, NodeName, NodeOptions, NodeOutputs, NullCheckpointStore,
    NullEventSink,
};

use crate::options::{as_finite_f64, as_i64, as_map_or_empty};

/// One recorded episode.
///
/// All three mappings are opaque to the core; `cycle_idx` records the cycle
/// at which the episode was appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Caller-supplied timestamp, or the append wall-clock time in UTC
    /// seconds when omitted.
    pub time: f64,
    /// Opaque situational mapping.
    pub context: Map<String, Value>,
    /// Opaque affect mapping.
    pub affect: Map<String, Value>,
    /// Opaque payload mapping.
    pub payload: Map<String, Value>,
    /// Cycle at which the episode was recorded.
    pub cycle_idx: u64,
}

/// Append-only autobiographical log for retrospective analysis.
///
/// Not a cache: this core never mutates or removes an episode, and append
/// order is the only ordering guarantee. Erasure, where required, belongs to
/// an external collaborator operating on a separate persistence layer.
pub struct EpisodicMemory {
    name: NodeName,
    episodes: Vec<Episode>,
    metrics: NodeMetrics,
    events: Arc<dyn EventSink>,
    checkpoints: Arc<dyn CheckpointStore>,
}

impl EpisodicMemory {
    /// Creates an episodic-memory node with no-op hooks.
    pub fn new(name: NodeName) -> Self {
        Self::with_hooks(name, Arc::new(NullEventSink), Arc::new(NullCheckpointStore))
    }

    /// Creates an episodic-memory node wired to the given collaborators.
    pub fn with_hooks(
        name: NodeName,
        events: Arc<dyn EventSink>,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            name,
            episodes: Vec::new(),
            metrics: NodeMetrics::new(),
            events,
            checkpoints,
        }
    }

    /// Number of recorded episodes.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Returns `true` if no episodes have been recorded.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    fn append(&mut self, ctx: &NodeContext, inputs: &NodeInputs) {
        let time = inputs
            .get("time")
            .and_then(as_finite_f64)
            .unwrap_or_else(|| Utc::now().timestamp_millis() as f64 / 1000.0);
        let episode = Episode {
            time,
            context: as_map_or_empty(inputs.get("context")),
            affect: as_map_or_empty(inputs.get("affect")),
            payload: as_map_or_empty(inputs.get("payload")),
            cycle_idx: ctx.cycle_idx(),
        };
        self.episodes.push(episode);
        self.metrics.incr_counter("appends", 1);
        debug!(
            node = %self.name,
            cycle_idx = ctx.cycle_idx(),
            count = self.episodes.len(),
            "episode appended"
        );

        emit_best_effort(
            self.events.as_ref(),
            &LifecycleEvent {
                node: self.name.clone(),
                run_id: *ctx.run_id(),
                cycle_idx: ctx.cycle_idx(),
                payload: json!({"kind": "episode_appended", "count": self.episodes.len()}),
            },
        );

        match serde_json::to_value(&self.episodes) {
            Ok(state) => checkpoint_best_effort(
                self.checkpoints.as_ref(),
                ctx.run_id(),
                ctx.cycle_idx(),
                &json!({"episodes": state}),
            ),
            Err(err) => warn!(node = %self.name, %err, "episode log not serialisable"),
        }
    }

    fn last(&self, requested: i64) -> Vec<Episode> {
        let take = requested.max(0) as usize;
        let take = take.min(self.episodes.len());
        self.episodes[self.episodes.len() - take..].to_vec()
    }
}

impl Node for EpisodicMemory {
    fn name(&self) -> &NodeName {
        &self.name
    }

    /// No recognised keys.
    fn configure(&mut self, _options: &NodeOptions) {}

    /// No-op: the log is autobiographical, not per-session state.
    fn warmup(&mut self, _ctx: &NodeContext) {}

    /// With `append: true`, records an episode from `time`/`context`/`affect`/
    /// `payload` (defaults substituted for whatever is missing) and returns
    /// `{count}`. With `query_last: N`, returns the last `min(max(N, 0), len)`
    /// episodes in append order under `episodes`, plus `{count}`. With
    /// neither, a pure `{count}` read. `append` takes precedence when both
    /// are supplied.
    fn process(&mut self, ctx: &NodeContext, inputs: &NodeInputs) -> NodeOutputs {
        let mut outputs = NodeOutputs::new();

        if inputs.get("append").and_then(Value::as_bool).unwrap_or(false) {
            self.append(ctx, inputs);
        } else if let Some(requested) = inputs.get("query_last").and_then(as_i64) {
            let selected = self.last(requested);
            let episodes = selected
                .iter()
                .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
                .collect();
            outputs.insert("episodes".into(), Value::Array(episodes));
        }

        outputs.insert("count".into(), json!(self.episodes.len()));
        outputs
    }

    fn metrics(&self) -> NodeMetrics {
        self.metrics.clone()
    }
}
