//! Core data model for the typed dataflow graph engine.
//!
//! Types here are pure data: tags, values, nodes, edges, graphs, and the
//! ephemeral run configuration. No scheduling or propagation logic lives in
//! this crate — see `graph-engine` for that.

mod edge;
mod graph;
mod ids;
mod node;
mod run_config;
mod tag;
mod value;

pub use edge::{Edge, EdgeBuildError};
pub use graph::{Graph, GraphModel, NodeDecl};
pub use ids::{EdgeId, GraphId, NodeId};
pub use node::Node;
pub use run_config::RunConfig;
pub use tag::TypeTag;
pub use value::Value;
