//! Error types for the node runtime.
//!
//! The taxonomy is deliberately small. Registry errors are fatal
//! configuration-time conditions, expected to abort startup rather than be
//! caught and retried. Everything a node sees at runtime — missing inputs,
//! malformed options, numeric edge cases — is resolved with defaults and never
//! surfaces as an error; degradation is observable only through
//! [`crate::NodeMetrics`]. Hook errors exist so collaborators can report
//! delivery failure, but the core logs and swallows them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NodeName;

// ---------------------------------------------------------------------------
// Registry errors — configuration-time, fatal
// ---------------------------------------------------------------------------

/// Errors raised by [`crate::NodeRegistry`].
///
/// Both variants are programmer/configuration errors: they should surface
/// immediately during the single-threaded bootstrap phase and halt it, not be
/// recovered at steady state.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryError {
    /// A node with this name is already registered.
    ///
    /// Node names are unique per registry; hitting this means the pipeline
    /// configuration wired two nodes to the same key.
    #[error("duplicate node name '{name}'")]
    DuplicateNodeName {
        /// The name that was registered twice.
        name: NodeName,
    },

    /// No node with this name exists in the registry.
    ///
    /// Produced by lookups; not expected once a pipeline is running.
    #[error("no node registered under '{name}'")]
    NodeNotFound {
        /// The name that failed to resolve.
        name: NodeName,
    },
}

// ---------------------------------------------------------------------------
// Hook errors — best-effort side effects
// ---------------------------------------------------------------------------

/// Failure reported by an [`crate::EventSink`] or [`crate::CheckpointStore`]
/// collaborator.
///
/// Delivery is fire-and-forget from the core's perspective: nodes log these
/// at `warn` and continue, and a failed hook never mutates or aborts the
/// node's own in-memory state.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookError {
    /// A lifecycle event could not be delivered.
    #[error("event delivery failed: {reason}")]
    DeliveryFailed {
        /// Collaborator-supplied description of the failure.
        reason: String,
    },

    /// A checkpoint could not be persisted.
    #[error("checkpoint persistence failed: {reason}")]
    PersistFailed {
        /// Collaborator-supplied description of the failure.
        reason: String,
    },
}
