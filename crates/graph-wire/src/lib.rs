//! HTTP wire DTOs for the graph execution engine's `/crud/*` and
//! `/graph/*` surface: request/response shapes shared between
//! `graph-web`'s handlers and its CLI client, kept deliberately free of
//! `axum` or any transport-specific type so both sides depend on the same
//! plain data.
//!
//! Type tags and values are carried over the wire using `graph_types`'s
//! own `TypeTag`/`Value` directly — both already derive `Facet` with
//! `rename_all = "snake_case"`, which is exactly the lowercase tag
//! vocabulary (`int`, `float`, `str`, `bool`, `list`, `dict`) the CRUD
//! surface is specified to accept and report.

mod edges;
mod error;
mod graphs;
mod nodes;
mod run;

pub use edges::{CreateEdgeRequest, CreateEdgeResponse, EdgeWire};
pub use error::ApiError;
pub use graphs::{
    CreateGraphRequest, CreateGraphResponse, EdgeAdjacency, GetGraphRequest, GetGraphResponse,
    NodeAdjacency,
};
pub use nodes::{CreateNodeRequest, CreateNodeResponse};
pub use run::{ExecutionResultMessage, NodeStateWire, ProcessGraphResponse, RunConfigRequest};
