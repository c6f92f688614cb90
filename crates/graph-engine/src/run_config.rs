use graph_types::{GraphModel, NodeId, RunConfig};

/// A `root_inputs` key that is not a root of the post-pruning graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotARootNode {
    pub node_id: NodeId,
}

/// Applies disable-pruning, then data overwrites, then root-input seeding,
/// in that order — overwrites on a node removed by pruning are silently
/// dropped because the node no longer exists in `model.nodes` to write
/// into.
pub fn apply(model: &mut GraphModel, config: &RunConfig) {
    for node_id in &config.disable_list {
        model.remove_node(node_id);
    }

    for (node_id, overrides) in &config.data_overwrites {
        if let Some(node) = model.nodes.get_mut(node_id) {
            for (key, value) in overrides {
                node.data_in.insert(key.clone(), value.clone());
            }
        }
    }

    for (node_id, values) in &config.root_inputs {
        if let Some(node) = model.nodes.get_mut(node_id) {
            for (key, value) in values {
                node.data_in.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Every `root_inputs` node_id must be a root (no incoming edge) of the
/// already-pruned graph. Checks *all* keys, not just the first — the
/// stricter reading of the contract (see root-admissibility design notes).
pub fn check_root_admissibility(model: &GraphModel, config: &RunConfig) -> Result<(), NotARootNode> {
    for node_id in config.root_inputs.keys() {
        let is_root = model.nodes.get(node_id).map(|node| node.is_root()).unwrap_or(false);
        if !is_root {
            return Err(NotARootNode { node_id: node_id.clone() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_types::{Edge, EdgeId, GraphId, Node, NodeDecl, Value};
    use std::collections::{BTreeMap, BTreeSet};

    fn chain_a_b() -> GraphModel {
        let a = Node::new(NodeId::new("a"), BTreeMap::new(), BTreeMap::new());
        let b = Node::new(NodeId::new("b"), BTreeMap::new(), BTreeMap::new());
        let edge = Edge::new(EdgeId::new("e1"), &a, &b, BTreeMap::new()).unwrap();
        GraphModel::from_parts(
            GraphId::new("g"),
            vec![
                NodeDecl { node_id: a.node_id, data_in_schema: BTreeMap::new(), data_out_schema: BTreeMap::new() },
                NodeDecl { node_id: b.node_id, data_in_schema: BTreeMap::new(), data_out_schema: BTreeMap::new() },
            ],
            vec![edge],
        )
    }

    #[test]
    fn disable_removes_node_and_its_edges() {
        let mut model = chain_a_b();
        let config = RunConfig {
            graph_id: GraphId::new("g"),
            root_inputs: BTreeMap::new(),
            disable_list: BTreeSet::from([NodeId::new("a")]),
            data_overwrites: BTreeMap::new(),
        };
        apply(&mut model, &config);
        assert!(!model.nodes.contains_key(&NodeId::new("a")));
        assert!(model.edges.is_empty());
    }

    #[test]
    fn overwrite_on_disabled_node_is_silently_ignored() {
        let mut model = chain_a_b();
        let config = RunConfig {
            graph_id: GraphId::new("g"),
            root_inputs: BTreeMap::new(),
            disable_list: BTreeSet::from([NodeId::new("a")]),
            data_overwrites: BTreeMap::from([(NodeId::new("a"), BTreeMap::from([("x".to_string(), Value::Int(1))]))]),
        };
        apply(&mut model, &config);
        assert!(!model.nodes.contains_key(&NodeId::new("a")));
    }

    #[test]
    fn non_root_seed_is_rejected() {
        let model = chain_a_b();
        let config = RunConfig {
            graph_id: GraphId::new("g"),
            root_inputs: BTreeMap::from([(NodeId::new("b"), BTreeMap::new())]),
            disable_list: BTreeSet::new(),
            data_overwrites: BTreeMap::new(),
        };
        let err = check_root_admissibility(&model, &config).unwrap_err();
        assert_eq!(err.node_id, NodeId::new("b"));
    }

    #[test]
    fn root_seed_is_accepted() {
        let model = chain_a_b();
        let config = RunConfig {
            graph_id: GraphId::new("g"),
            root_inputs: BTreeMap::from([(NodeId::new("a"), BTreeMap::new())]),
            disable_list: BTreeSet::new(),
            data_overwrites: BTreeMap::new(),
        };
        assert!(check_root_admissibility(&model, &config).is_ok());
    }
}
