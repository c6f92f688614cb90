use std::collections::BTreeMap;

use facet::Facet;
use graph_types::{NodeId, TypeTag};

/// `POST /crud/create_nodes` request body.
#[derive(Facet, Debug, Clone)]
pub struct CreateNodeRequest {
    pub node_id: NodeId,
    pub data_in: BTreeMap<String, TypeTag>,
    #[facet(default)]
    pub data_out: BTreeMap<String, TypeTag>,
}

#[derive(Facet, Debug, Clone)]
pub struct CreateNodeResponse {
    pub message: String,
    pub node_id: NodeId,
}
