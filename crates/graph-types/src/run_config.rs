use std::collections::{BTreeMap, BTreeSet};

use facet::Facet;

use crate::ids::{GraphId, NodeId};
use crate::value::Value;

/// Per-request run configuration. Ephemeral — never persisted, and
/// discarded along with the execution snapshot it was applied to.
#[derive(Facet, Clone, Debug)]
pub struct RunConfig {
    pub graph_id: GraphId,
    /// node_id -> (input key -> seeded value).
    #[facet(default)]
    pub root_inputs: BTreeMap<NodeId, BTreeMap<String, Value>>,
    #[facet(default)]
    pub disable_list: BTreeSet<NodeId>,
    /// node_id -> (input key -> overwrite value), applied before
    /// `root_inputs` and silently ignored for disabled nodes.
    #[facet(default)]
    pub data_overwrites: BTreeMap<NodeId, BTreeMap<String, Value>>,
}
