//! Axum HTTP surface for the typed dataflow graph execution engine.
//!
//! This crate is the only place in the workspace that knows about HTTP
//! status codes, JSON framing, or an async runtime — `graph-engine` stays
//! synchronous and transport-agnostic, and this crate's handlers are thin
//! glue: decode a `graph-wire` DTO, call into `graph-engine` or
//! `graph-sqlite`, map the result back to a response.

pub mod api;
pub mod app;
pub mod snapshot;
pub mod util;
