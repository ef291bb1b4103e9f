//! Softmax/top-k selector.

use std::cmp::Ordering;

use serde_json::{json, Value};
use tracing::debug;

use pipeline::{
    Node, NodeContext, NodeInputs, NodeMetrics, NodeName, NodeOptions, NodeOutputs,
};

use crate::options::{as_finite_f64, as_usize};

/// Selection width applied when `configure` has not set one.
pub const DEFAULT_TOP_K: usize = 1;

/// Softmax temperature applied when `configure` has not set one.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

// Temperature floor: keeps the exponent divisor strictly positive.
const MIN_TEMPERATURE: f64 = 1e-6;

// Probability floor inside ln() when computing entropy.
const LN_EPSILON: f64 = 1e-12;

/// Central resource-allocation signal: given scores for N candidates, decides
/// which `top_k` receive attention and reports the Shannon entropy of the
/// softmax distribution as a diagnostic of decision sharpness.
///
/// Stateless across cycles apart from the retained `entropy` gauge.
pub struct AttentionController {
    name: NodeName,
    top_k: usize,
    temperature: f64,
    metrics: NodeMetrics,
}

impl AttentionController {
    /// Creates an attention controller with default selection parameters.
    pub fn new(name: NodeName) -> Self {
        Self {
            name,
            top_k: DEFAULT_TOP_K,
            temperature: DEFAULT_TEMPERATURE,
            metrics: NodeMetrics::new(),
        }
    }

    /// Current selection width.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Current softmax temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Softmax over `scores` at the configured temperature.
    ///
    /// The maximum score is subtracted before exponentiation; softmax is
    /// shift-invariant, so probabilities are unchanged for finite inputs and
    /// large magnitudes no longer overflow.
    fn softmax(&self, scores: &[f64]) -> Vec<f64> {
        let t = self.temperature.max(MIN_TEMPERATURE);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| ((s - max) / t).exp()).collect();
        let mut sum: f64 = exps.iter().sum();
        if sum == 0.0 {
            sum = 1.0;
        }
        exps.iter().map(|e| e / sum).collect()
    }

    /// Indices of the `top_k` highest probabilities, descending; equal
    /// probabilities keep original index order (stable sort).
    fn select(&self, probs: &[f64]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..probs.len()).collect();
        order.sort_by(|&a, &b| probs[b].partial_cmp(&probs[a]).unwrap_or(Ordering::Equal));
        order.truncate(self.top_k.min(probs.len()));
        order
    }
}

impl Node for AttentionController {
    fn name(&self) -> &NodeName {
        &self.name
    }

    /// Recognised keys: `top_k` (integer), `temperature` (float, clamped to a
    /// strictly positive floor).
    fn configure(&mut self, options: &NodeOptions) {
        if let Some(top_k) = options.get("top_k").and_then(as_usize) {
            self.top_k = top_k;
        }
        if let Some(temperature) = options.get("temperature").and_then(as_finite_f64) {
            self.temperature = temperature.max(MIN_TEMPERATURE);
        }
    }

    fn warmup(&mut self, _ctx: &NodeContext) {}

    /// Expects `scores` (array of numbers; non-finite entries coerce to 0.0).
    ///
    /// Empty or absent scores return `{attn: [], entropy: 0.0}` without
    /// touching the entropy gauge.
    fn process(&mut self, ctx: &NodeContext, inputs: &NodeInputs) -> NodeOutputs {
        let scores: Vec<f64> = inputs
            .get("scores")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .map(|v| v.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();

        let mut outputs = NodeOutputs::new();
        if scores.is_empty() {
            outputs.insert("attn".into(), json!([]));
            outputs.insert("entropy".into(), json!(0.0));
            return outputs;
        }

        let probs = self.softmax(&scores);
        let entropy: f64 = -probs.iter().map(|p| p * p.max(LN_EPSILON).ln()).sum::<f64>();
        let attn = self.select(&probs);

        self.metrics.set_gauge("entropy", entropy);
        debug!(
            node = %self.name,
            cycle_idx = ctx.cycle_idx(),
            candidates = scores.len(),
            selected = attn.len(),
            entropy,
            "attention allocated"
        );

        outputs.insert("attn".into(), json!(attn));
        outputs.insert("entropy".into(), json!(entropy));
        outputs
    }

    fn metrics(&self) -> NodeMetrics {
        self.metrics.clone()
    }
}
