use std::collections::BTreeMap;

use facet::Facet;
use graph_types::{GraphId, NodeId, TypeTag};

/// `POST /crud/create_graph` request body.
#[derive(Facet, Debug, Clone)]
pub struct CreateGraphRequest {
    pub graph_id: GraphId,
    pub nodes: Vec<NodeId>,
}

#[derive(Facet, Debug, Clone)]
pub struct CreateGraphResponse {
    pub message: String,
    pub graph_id: GraphId,
}

/// `POST /crud/get_graph` request body.
#[derive(Facet, Debug, Clone)]
pub struct GetGraphRequest {
    pub graph_id: GraphId,
}

/// One node's entry in the adjacency-list response: its schemas plus its
/// outgoing edges, denormalized the same way `GraphModel::from_parts`
/// expects them on ingest.
#[derive(Facet, Debug, Clone)]
pub struct NodeAdjacency {
    pub data_in: BTreeMap<String, TypeTag>,
    pub data_out: BTreeMap<String, TypeTag>,
    pub edges: Vec<EdgeAdjacency>,
}

/// One outgoing edge as reported per-node in `get_graph`'s response:
/// `{dst_node, data_in, data_out}`, where `data_in`/`data_out` are the
/// *destination* node's schemas — matching spec.md §6's documented shape.
#[derive(Facet, Debug, Clone)]
pub struct EdgeAdjacency {
    pub dst_node: NodeId,
    pub data_in: BTreeMap<String, TypeTag>,
    pub data_out: BTreeMap<String, TypeTag>,
}

/// `{node_id: {data_in, data_out, edges: [...]}}`, keyed by the node id's
/// string form — `graph_types::NodeId` is an opaque string newtype, not a
/// map-key-capable `Facet` type, so the wire key is its plain `String`.
pub type GetGraphResponse = BTreeMap<String, NodeAdjacency>;
