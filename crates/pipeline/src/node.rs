//! The `Node` protocol: the in-process call contract between the orchestrator
//! and every processing unit.

use serde_json::{Map, Value};

use crate::{NodeContext, NodeMetrics, NodeName};

/// Configuration set passed to [`Node::configure`].
///
/// Recognised keys are node-specific; unrecognised keys are ignored and
/// missing keys retain the prior (or default) value.
pub type NodeOptions = Map<String, Value>;

/// Named inputs for one [`Node::process`] call.
pub type NodeInputs = Map<String, Value>;

/// Named outputs returned by one [`Node::process`] call.
pub type NodeOutputs = Map<String, Value>;

// ---------------------------------------------------------------------------

/// A named, stateful processing unit invoked by an external orchestrator.
///
/// Each instance exclusively owns its private mutable state; the mutating
/// operations take `&mut self` so Rust's ownership rules enforce the
/// single-caller contract at compile time. The remaining contract is
/// behavioural:
///
/// - **One call at a time.** A single instance must never be driven from two
///   cycles or threads concurrently. Use one instance per logical pipeline,
///   or wrap a shared instance in an external mutex.
/// - **`configure` always succeeds.** Invalid values are coerced or
///   defaulted; unrecognised keys are ignored. No I/O.
/// - **`warmup` is idempotent.** Calling it twice in a row leaves the same
///   observable state as calling it once. It resets per-session transient
///   state only.
/// - **`process` never fails.** Missing or malformed optional inputs resolve
///   to defaults and the call returns a best-effort result. Degradation is
///   reported through metrics, not errors.
pub trait Node {
    /// Stable name used as the registry key.
    fn name(&self) -> &NodeName;

    /// Applies a configuration set. Never fails.
    fn configure(&mut self, options: &NodeOptions);

    /// Resets per-session transient state. Idempotent.
    fn warmup(&mut self, ctx: &NodeContext);

    /// Runs the node's per-cycle computation and returns its named outputs.
    fn process(&mut self, ctx: &NodeContext, inputs: &NodeInputs) -> NodeOutputs;

    /// Returns a snapshot of the node's current instrumentation.
    ///
    /// The returned value is a copy: callers cannot corrupt the node's
    /// internal counters through it, and two consecutive calls without an
    /// intervening `process` return equal values.
    fn metrics(&self) -> NodeMetrics;
}
