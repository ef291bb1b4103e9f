//! Core node-runtime domain for the Wavec cognitive pipeline layer.
//!
//! This crate contains every domain concept of the runtime: the per-cycle
//! context, the per-node instrumentation value, the `Node` protocol, the
//! name-unique registry, and the port traits for lifecycle events and
//! checkpoints. Node implementations live in the `nodes` crate; they never
//! add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; collaborators outside the core define *how*
//! to supply it (event delivery, durable snapshots, scheduling).
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype domain identifiers (`RunId`, `NodeName`) |
//! | [`context`] | Immutable per-cycle [`NodeContext`] |
//! | [`metrics`] | Per-node [`NodeMetrics`] instrumentation value |
//! | [`node`] | The [`Node`] protocol and option/input/output aliases |
//! | [`registry`] | Name-unique [`NodeRegistry`] |
//! | [`hooks`] | Injected event/checkpoint boundaries |
//! | [`errors`] | Registry and hook error types |

pub mod context;
pub mod errors;
pub mod hooks;
pub mod identifiers;
pub mod metrics;
pub mod node;
pub mod registry;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use context::{NodeContext, DEFAULT_LATENCY_BUDGET_MS, DEFAULT_MEMORY_BUDGET_BYTES};
pub use errors::{HookError, RegistryError};
pub use hooks::{
    checkpoint_best_effort, emit_best_effort, CheckpointStore, EventSink, LifecycleEvent,
    NullCheckpointStore, NullEventSink,
};
pub use identifiers::{NodeName, RunId};
pub use metrics::NodeMetrics;
pub use node::{Node, NodeInputs, NodeOptions, NodeOutputs};
pub use registry::NodeRegistry;
