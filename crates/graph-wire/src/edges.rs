use std::collections::BTreeMap;

use facet::Facet;
use graph_types::{EdgeId, NodeId};

/// `POST /crud/create_edges` request body.
#[derive(Facet, Debug, Clone)]
pub struct CreateEdgeRequest {
    pub edge_id: EdgeId,
    pub src_node: NodeId,
    pub dst_node: NodeId,
    /// source-output key -> destination-input key.
    pub src_to_dst_data_keys: BTreeMap<String, String>,
}

#[derive(Facet, Debug, Clone)]
pub struct CreateEdgeResponse {
    pub message: String,
    pub edge_id: EdgeId,
}

/// One row of `GET /crud/get_edges`'s full edge list. The response body is
/// a bare JSON array of these (`Vec<EdgeWire>`), not wrapped in an object —
/// spec.md §6 says the route "returns the full edge list".
#[derive(Facet, Debug, Clone)]
pub struct EdgeWire {
    pub edge_id: EdgeId,
    pub src_node: NodeId,
    pub dst_node: NodeId,
    pub src_to_dst_data_keys: BTreeMap<String, String>,
}
