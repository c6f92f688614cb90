use std::collections::BTreeMap;

use graph_types::{Edge, GraphModel, NodeId, Value};

/// Walks the schedule level by level (levels already internally
/// id-sorted by [`crate::scheduler::schedule`]) and, for each node, mirrors
/// its `data_out` from `data_in` and then propagates along outgoing edges
/// under the write-priority rule.
pub fn propagate(model: &mut GraphModel, levels: &[Vec<NodeId>]) {
    for level in levels {
        for node_id in level {
            mark_visited(model, node_id);
            mirror_data_out(model, node_id);

            let outgoing: Vec<Edge> = model.outgoing_edges(node_id).cloned().collect();
            for edge in &outgoing {
                if dst_already_visited(model, &edge.dst_node) {
                    continue;
                }
                if !is_highest_priority_writer(model, node_id, &edge.dst_node) {
                    continue;
                }
                transfer(model, node_id, edge);
            }
        }
    }
}

fn mark_visited(model: &mut GraphModel, node_id: &NodeId) {
    if let Some(node) = model.nodes.get_mut(node_id) {
        node.visited = true;
    }
}

fn dst_already_visited(model: &GraphModel, dst: &NodeId) -> bool {
    model.nodes.get(dst).map(|node| node.visited).unwrap_or(true)
}

/// `data_out[k] = data_in[k]` for every declared output key, deep-copying
/// compound values by cloning rather than moving.
fn mirror_data_out(model: &mut GraphModel, node_id: &NodeId) {
    let Some(node) = model.nodes.get(node_id) else { return };
    let mirrored: BTreeMap<String, Value> = node
        .data_out_schema
        .keys()
        .map(|key| (key.clone(), node.data_in.get(key).cloned().unwrap_or(Value::Unset)))
        .collect();
    if let Some(node) = model.nodes.get_mut(node_id) {
        node.data_out = mirrored;
    }
}

fn transfer(model: &mut GraphModel, node_id: &NodeId, edge: &Edge) {
    let Some(src) = model.nodes.get(node_id) else { return };
    let values: Vec<(String, Value)> = edge
        .key_map
        .iter()
        .filter_map(|(src_key, dst_key)| {
            src.data_out.get(src_key).map(|value| (dst_key.clone(), value.clone()))
        })
        .collect();
    if let Some(dst) = model.nodes.get_mut(&edge.dst_node) {
        for (dst_key, value) in values {
            dst.data_in.insert(dst_key, value);
        }
    }
}

/// Priority order over `dst`'s predecessors is `(-level, node_id)`
/// ascending — greatest level wins, lexicographically smallest id breaks
/// ties. `node_id` (the node currently being processed, always already
/// visited by this point) is the writer-of-record iff no predecessor
/// ranked ahead of it in that order has been visited yet.
fn is_highest_priority_writer(model: &GraphModel, node_id: &NodeId, dst: &NodeId) -> bool {
    let Some(dst_node) = model.nodes.get(dst) else { return false };

    let mut predecessors: Vec<&NodeId> = dst_node.incoming_sources.iter().collect();
    predecessors.sort_by_key(|pred| {
        let level = model.nodes.get(*pred).map(|n| n.level).unwrap_or(i64::MAX);
        (-level, (*pred).clone())
    });

    for pred in predecessors {
        if pred == node_id {
            return true;
        }
        if model.nodes.get(pred).map(|n| n.visited).unwrap_or(false) {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::schedule;
    use graph_types::{EdgeId, GraphId, Node, NodeDecl, TypeTag};

    fn int_node(id: &str) -> Node {
        Node::new(
            NodeId::new(id),
            BTreeMap::from([("x".to_string(), TypeTag::Int)]),
            BTreeMap::from([("x".to_string(), TypeTag::Int)]),
        )
    }

    fn decl_from(node: &Node) -> NodeDecl {
        NodeDecl {
            node_id: node.node_id.clone(),
            data_in_schema: node.data_in_schema.clone(),
            data_out_schema: node.data_out_schema.clone(),
        }
    }

    /// Scenario A: diamond A->{B,C}->D, root input on A, overwrites on B
    /// and C; B and C tie at level 1, lexicographic tie-break picks B.
    #[test]
    fn diamond_tie_break_picks_lexicographically_smaller_id() {
        let a = int_node("a");
        let b = int_node("b");
        let c = int_node("c");
        let d = int_node("d");
        let key_map = BTreeMap::from([("x".to_string(), "x".to_string())]);
        let edges = vec![
            Edge::new(EdgeId::new("ab"), &a, &b, key_map.clone()).unwrap(),
            Edge::new(EdgeId::new("ac"), &a, &c, key_map.clone()).unwrap(),
            Edge::new(EdgeId::new("bd"), &b, &d, key_map.clone()).unwrap(),
            Edge::new(EdgeId::new("cd"), &c, &d, key_map).unwrap(),
        ];
        let mut model = GraphModel::from_parts(
            GraphId::new("g"),
            vec![decl_from(&a), decl_from(&b), decl_from(&c), decl_from(&d)],
            edges,
        );

        model.nodes.get_mut(&NodeId::new("a")).unwrap().data_in.insert("x".to_string(), Value::Int(1));
        model.nodes.get_mut(&NodeId::new("b")).unwrap().data_in.insert("x".to_string(), Value::Int(10));
        model.nodes.get_mut(&NodeId::new("c")).unwrap().data_in.insert("x".to_string(), Value::Int(20));

        let levels = schedule(&mut model);
        propagate(&mut model, &levels);

        assert_eq!(model.nodes[&NodeId::new("d")].data_in.get("x"), Some(&Value::Int(10)));
        assert_eq!(model.nodes[&NodeId::new("a")].level, 0);
        assert_eq!(model.nodes[&NodeId::new("b")].level, 1);
        assert_eq!(model.nodes[&NodeId::new("c")].level, 1);
        assert_eq!(model.nodes[&NodeId::new("d")].level, 2);
    }

    /// Scenario B: same graph with B disabled — D's only predecessor is C.
    #[test]
    fn disabling_a_tied_predecessor_falls_through_to_the_other() {
        let a = int_node("a");
        let c = int_node("c");
        let d = int_node("d");
        let key_map = BTreeMap::from([("x".to_string(), "x".to_string())]);
        let edges = vec![
            Edge::new(EdgeId::new("ac"), &a, &c, key_map.clone()).unwrap(),
            Edge::new(EdgeId::new("cd"), &c, &d, key_map).unwrap(),
        ];
        let mut model =
            GraphModel::from_parts(GraphId::new("g"), vec![decl_from(&a), decl_from(&c), decl_from(&d)], edges);
        model.nodes.get_mut(&NodeId::new("a")).unwrap().data_in.insert("x".to_string(), Value::Int(1));

        let levels = schedule(&mut model);
        propagate(&mut model, &levels);

        assert_eq!(model.nodes[&NodeId::new("d")].data_in.get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn single_node_data_out_mirrors_data_in() {
        let a = int_node("a");
        let mut model = GraphModel::from_parts(GraphId::new("g"), vec![decl_from(&a)], vec![]);
        model.nodes.get_mut(&NodeId::new("a")).unwrap().data_in.insert("x".to_string(), Value::Int(42));

        let levels = schedule(&mut model);
        propagate(&mut model, &levels);

        assert_eq!(model.nodes[&NodeId::new("a")].data_out.get("x"), Some(&Value::Int(42)));
        assert!(model.nodes[&NodeId::new("a")].visited);
    }

    #[test]
    fn unreachable_node_keeps_unset_on_unwritten_keys() {
        let a = int_node("a");
        let b = int_node("b");
        let mut model = GraphModel::from_parts(GraphId::new("g"), vec![decl_from(&a), decl_from(&b)], vec![]);
        model.nodes.get_mut(&NodeId::new("a")).unwrap().data_in.insert("x".to_string(), Value::Int(1));

        let levels = schedule(&mut model);
        propagate(&mut model, &levels);

        assert_eq!(model.nodes[&NodeId::new("b")].data_in.get("x"), Some(&Value::Unset));
    }
}
