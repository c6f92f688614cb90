use std::collections::{BTreeMap, BTreeSet};

use facet::Facet;

use crate::edge::Edge;
use crate::ids::{GraphId, NodeId};
use crate::node::Node;
use crate::tag::TypeTag;

/// A persisted graph: an id plus the set of node ids it contains. Edges are
/// not embedded — they live in a global pool and are filtered to those
/// whose endpoints both belong to `nodes`.
#[derive(Facet, Clone, Debug)]
pub struct Graph {
    pub graph_id: GraphId,
    pub nodes: BTreeSet<NodeId>,
}

/// Raw schema declaration for one node, as read off the adjacency-list
/// ingest surface before `Node`'s schema correction and value
/// initialization are applied.
pub struct NodeDecl {
    pub node_id: NodeId,
    pub data_in_schema: BTreeMap<String, TypeTag>,
    pub data_out_schema: BTreeMap<String, TypeTag>,
}

/// The in-memory, owned snapshot an execution runs against: nodes keyed by
/// id plus the edge pool already filtered to this graph's membership.
///
/// This is the engine-side counterpart to the persisted [`Graph`] record —
/// deep-copied per request, mutated freely by run-config application and
/// propagation, and discarded at the end of the request. Nothing here is
/// ever written back to storage.
#[derive(Clone, Debug)]
pub struct GraphModel {
    pub graph_id: GraphId,
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: Vec<Edge>,
}

impl GraphModel {
    /// Builds a model from node declarations and an edge list already
    /// filtered to this graph's node set. For each edge, records the
    /// source in the destination's `incoming_sources`.
    pub fn from_parts(graph_id: GraphId, decls: Vec<NodeDecl>, edges: Vec<Edge>) -> Self {
        let mut nodes: BTreeMap<NodeId, Node> = decls
            .into_iter()
            .map(|decl| {
                let node = Node::new(decl.node_id.clone(), decl.data_in_schema, decl.data_out_schema);
                (decl.node_id, node)
            })
            .collect();

        for edge in &edges {
            if let Some(dst) = nodes.get_mut(&edge.dst_node) {
                dst.incoming_sources.insert(edge.src_node.clone());
            }
        }

        Self { graph_id, nodes, edges }
    }

    pub fn outgoing_edges(&self, node_id: &NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| &edge.src_node == node_id)
    }

    pub fn incoming_edges(&self, node_id: &NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| &edge.dst_node == node_id)
    }

    /// Removes a node and every edge touching it, and drops it from any
    /// other node's recorded predecessor set. Used by run-config disable
    /// pruning; exposed here since it is pure graph-shape bookkeeping, not
    /// scheduling logic.
    pub fn remove_node(&mut self, node_id: &NodeId) {
        self.nodes.remove(node_id);
        self.edges
            .retain(|edge| &edge.src_node != node_id && &edge.dst_node != node_id);
        for node in self.nodes.values_mut() {
            node.incoming_sources.remove(node_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(id: &str) -> NodeDecl {
        NodeDecl {
            node_id: NodeId::new(id),
            data_in_schema: BTreeMap::new(),
            data_out_schema: BTreeMap::new(),
        }
    }

    #[test]
    fn incoming_sources_derived_from_edges() {
        let a = Node::new(NodeId::new("a"), BTreeMap::new(), BTreeMap::new());
        let b = Node::new(NodeId::new("b"), BTreeMap::new(), BTreeMap::new());
        let edge = Edge::new(
            crate::ids::EdgeId::new("e1"),
            &a,
            &b,
            BTreeMap::new(),
        )
        .unwrap();

        let model = GraphModel::from_parts(GraphId::new("g"), vec![decl("a"), decl("b")], vec![edge]);
        assert!(model.nodes[&NodeId::new("a")].incoming_sources.is_empty());
        assert_eq!(
            model.nodes[&NodeId::new("b")].incoming_sources,
            BTreeSet::from([NodeId::new("a")])
        );
    }

    #[test]
    fn remove_node_drops_edges_and_predecessor_entries() {
        let a = Node::new(NodeId::new("a"), BTreeMap::new(), BTreeMap::new());
        let b = Node::new(NodeId::new("b"), BTreeMap::new(), BTreeMap::new());
        let edge = Edge::new(crate::ids::EdgeId::new("e1"), &a, &b, BTreeMap::new()).unwrap();
        let mut model = GraphModel::from_parts(GraphId::new("g"), vec![decl("a"), decl("b")], vec![edge]);

        model.remove_node(&NodeId::new("a"));
        assert!(!model.nodes.contains_key(&NodeId::new("a")));
        assert!(model.edges.is_empty());
        assert!(model.nodes[&NodeId::new("b")].incoming_sources.is_empty());
    }
}
