//! Validation, scheduling, and priority-governed propagation for the typed
//! dataflow graph engine.
//!
//! This crate is synchronous and single-threaded by design — no async
//! runtime types appear anywhere in its API or internals. Callers own a
//! [`graph_types::GraphModel`] snapshot for the lifetime of one request and
//! discard it on completion; nothing here ever touches persistent storage.

mod error;
mod propagator;
mod run_config;
mod scheduler;
mod service;
mod structure;
mod validator;

pub use error::ValidationError;
pub use run_config::NotARootNode;
pub use service::{execute, ExecutionOutcome, NodeState};
pub use structure::{Disconnected, HasCycle};
pub use validator::validate;
