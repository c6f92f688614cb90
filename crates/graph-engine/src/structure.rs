use std::collections::{BTreeMap, BTreeSet};

use graph_types::{GraphModel, NodeId};

/// A back-edge was found during depth-first traversal of the directed
/// graph: at least one directed cycle exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasCycle;

/// Not every surviving node is reachable from every other in the
/// undirected projection: the graph has more than one connected component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnected;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// DFS with recursion/visited/on-stack coloring. White = unvisited, gray =
/// on the current recursion stack, black = fully explored. A white->gray
/// edge is tree traversal; a gray->gray edge is a back-edge and means a
/// cycle.
pub fn detect_cycle(model: &GraphModel) -> Result<(), HasCycle> {
    let mut color: BTreeMap<&NodeId, Color> = model.nodes.keys().map(|id| (id, Color::White)).collect();

    for start in model.nodes.keys() {
        if color[start] == Color::White {
            visit(model, start, &mut color)?;
        }
    }
    Ok(())
}

fn visit<'a>(
    model: &'a GraphModel,
    node_id: &'a NodeId,
    color: &mut BTreeMap<&'a NodeId, Color>,
) -> Result<(), HasCycle> {
    color.insert(node_id, Color::Gray);
    for edge in model.outgoing_edges(node_id) {
        match color.get(&edge.dst_node).copied() {
            Some(Color::Gray) => return Err(HasCycle),
            Some(Color::White) => visit(model, &edge.dst_node, color)?,
            Some(Color::Black) | None => {}
        }
    }
    color.insert(node_id, Color::Black);
    Ok(())
}

/// Weak connectivity: DFS on the undirected projection (neighbor set =
/// predecessors ∪ successors). An empty graph is trivially connected.
pub fn check_connected(model: &GraphModel) -> Result<(), Disconnected> {
    let Some(start) = model.nodes.keys().next() else {
        return Ok(());
    };

    let mut neighbors: BTreeMap<&NodeId, BTreeSet<&NodeId>> =
        model.nodes.keys().map(|id| (id, BTreeSet::new())).collect();
    for edge in &model.edges {
        neighbors.entry(&edge.src_node).or_default().insert(&edge.dst_node);
        neighbors.entry(&edge.dst_node).or_default().insert(&edge.src_node);
    }

    let mut seen: BTreeSet<&NodeId> = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(node_id) = stack.pop() {
        if !seen.insert(node_id) {
            continue;
        }
        for neighbor in neighbors.get(node_id).into_iter().flatten() {
            if !seen.contains(neighbor) {
                stack.push(neighbor);
            }
        }
    }

    if seen.len() == model.nodes.len() {
        Ok(())
    } else {
        Err(Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_types::{Edge, EdgeId, GraphId, Node, NodeDecl};

    fn decl(id: &str) -> NodeDecl {
        NodeDecl {
            node_id: NodeId::new(id),
            data_in_schema: Default::default(),
            data_out_schema: Default::default(),
        }
    }

    fn edge(id: &str, src: &str, dst: &str) -> Edge {
        let src_node = Node::new(NodeId::new(src), Default::default(), Default::default());
        let dst_node = Node::new(NodeId::new(dst), Default::default(), Default::default());
        Edge::new(EdgeId::new(id), &src_node, &dst_node, Default::default()).unwrap()
    }

    #[test]
    fn empty_graph_has_no_cycle_and_is_connected() {
        let model = GraphModel::from_parts(GraphId::new("g"), vec![], vec![]);
        assert!(detect_cycle(&model).is_ok());
        assert!(check_connected(&model).is_ok());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let model = GraphModel::from_parts(GraphId::new("g"), vec![decl("a")], vec![edge("e1", "a", "a")]);
        assert_eq!(detect_cycle(&model), Err(HasCycle));
    }

    #[test]
    fn chain_has_no_cycle() {
        let model = GraphModel::from_parts(
            GraphId::new("g"),
            vec![decl("a"), decl("b"), decl("c")],
            vec![edge("e1", "a", "b"), edge("e2", "b", "c")],
        );
        assert!(detect_cycle(&model).is_ok());
    }

    #[test]
    fn longer_cycle_is_detected() {
        let model = GraphModel::from_parts(
            GraphId::new("g"),
            vec![decl("a"), decl("b"), decl("c"), decl("d")],
            vec![
                edge("e1", "a", "b"),
                edge("e2", "b", "c"),
                edge("e3", "c", "d"),
                edge("e4", "d", "a"),
            ],
        );
        assert_eq!(detect_cycle(&model), Err(HasCycle));
    }

    #[test]
    fn disjoint_pairs_are_disconnected() {
        let model = GraphModel::from_parts(
            GraphId::new("g"),
            vec![decl("a"), decl("b"), decl("c"), decl("d")],
            vec![edge("e1", "a", "b"), edge("e2", "c", "d")],
        );
        assert_eq!(check_connected(&model), Err(Disconnected));
    }

    #[test]
    fn single_node_is_connected() {
        let model = GraphModel::from_parts(GraphId::new("g"), vec![decl("a")], vec![]);
        assert!(check_connected(&model).is_ok());
    }
}
