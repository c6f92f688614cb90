use std::collections::{BTreeMap, BTreeSet};

use facet::Facet;
use graph_types::{GraphId, NodeId, RunConfig, Value};

/// `POST /graph/process_graph` (and its alias `/graph/graph_run_config`)
/// request body.
#[derive(Facet, Debug, Clone)]
pub struct RunConfigRequest {
    pub graph_id: GraphId,
    /// node_id -> (input key -> seeded value).
    #[facet(default)]
    pub root_inputs: BTreeMap<String, BTreeMap<String, Value>>,
    #[facet(default)]
    pub disable_list: BTreeSet<String>,
    /// node_id -> (input key -> overwrite value).
    #[facet(default)]
    pub data_overwrites: BTreeMap<String, BTreeMap<String, Value>>,
}

/// One node's final recorded state, as reported in the `Completed`
/// response body.
#[derive(Facet, Debug, Clone)]
pub struct NodeStateWire {
    pub level: i64,
    pub visited: bool,
    pub data_in: BTreeMap<String, Value>,
    pub data_out: BTreeMap<String, Value>,
}

impl RunConfigRequest {
    /// Lifts the wire's plain-`String` node ids into the domain's
    /// newtyped `NodeId`. Pure reshaping — admissibility and schema
    /// checks happen in `graph-engine`, not here.
    pub fn into_run_config(self) -> RunConfig {
        RunConfig {
            graph_id: self.graph_id,
            root_inputs: self
                .root_inputs
                .into_iter()
                .map(|(node_id, values)| (NodeId::new(node_id), values))
                .collect(),
            disable_list: self.disable_list.into_iter().map(NodeId::new).collect(),
            data_overwrites: self
                .data_overwrites
                .into_iter()
                .map(|(node_id, values)| (NodeId::new(node_id), values))
                .collect(),
        }
    }
}

/// The `Completed` shape of `process_graph`'s response: `{node_id:
/// {level, visited, data_in, data_out}}`.
pub type ProcessGraphResponse = BTreeMap<String, NodeStateWire>;

/// The sentinel shape for the `Cycle`/`Islands`/`NotARoot` outcomes:
/// `{"Result": "CYCLE DETECTED" | "ISLANDS DETECTED" | "IT IS NOT A ROOT NODE"}`.
#[derive(Facet, Debug, Clone)]
pub struct ExecutionResultMessage {
    #[facet(rename = "Result")]
    pub result: String,
}

impl ExecutionResultMessage {
    pub const CYCLE: &'static str = "CYCLE DETECTED";
    pub const ISLANDS: &'static str = "ISLANDS DETECTED";
    pub const NOT_A_ROOT: &'static str = "IT IS NOT A ROOT NODE";

    pub fn new(result: &str) -> Self {
        Self { result: result.to_string() }
    }
}
