//! Wavec reference node implementations.
//!
//! Three concrete [`pipeline::Node`]s cover the runtime's core concerns:
//!
//! | Node | Responsibility |
//! |------|----------------|
//! | [`WorkingMemory`] | Bounded, recency-ordered buffer of recent items |
//! | [`AttentionController`] | Softmax/top-k selection over a score vector |
//! | [`EpisodicMemory`] | Append-only, time-ordered log of episodes |
//!
//! ## Architectural Layer
//!
//! **Orchestration-facing.** Each node exclusively owns its private mutable
//! state and speaks only the `Node` protocol; domain rules and port traits
//! live in the [`pipeline`] crate. Hook collaborators ([`pipeline::EventSink`],
//! [`pipeline::CheckpointStore`]) are injected at construction; the defaults
//! are no-ops.

pub mod attention;
pub mod episodic;
mod options;
pub mod working_memory;

pub use attention::{AttentionController, DEFAULT_TEMPERATURE, DEFAULT_TOP_K};
pub use episodic::{Episode, EpisodicMemory};
pub use working_memory::{WorkingMemory, DEFAULT_CAPACITY};
