use graph_types::GraphModel;

use crate::error::ValidationError;

/// Static, pre-execution checks over an already-pruned snapshot. Each
/// failure short-circuits with a distinct error kind rather than
/// accumulating a list — the engine never partially executes a malformed
/// graph.
pub fn validate(model: &GraphModel) -> Result<(), ValidationError> {
    for edge in &model.edges {
        let src = model.nodes.get(&edge.src_node).ok_or_else(|| ValidationError::UnknownNode {
            edge_id: edge.edge_id.clone(),
            node_id: edge.src_node.clone(),
        })?;
        let dst = model.nodes.get(&edge.dst_node).ok_or_else(|| ValidationError::UnknownNode {
            edge_id: edge.edge_id.clone(),
            node_id: edge.dst_node.clone(),
        })?;

        for (src_key, dst_key) in &edge.key_map {
            let src_tag = src.data_out_schema.get(src_key).ok_or_else(|| ValidationError::UnknownSourceKey {
                edge_id: edge.edge_id.clone(),
                key: src_key.clone(),
            })?;
            let dst_tag = dst.data_in_schema.get(dst_key).ok_or_else(|| ValidationError::UnknownDestKey {
                edge_id: edge.edge_id.clone(),
                key: dst_key.clone(),
            })?;
            if src_tag != dst_tag {
                return Err(ValidationError::TypeMismatch {
                    edge_id: edge.edge_id.clone(),
                    src_key: src_key.clone(),
                    dst_key: dst_key.clone(),
                });
            }
        }
    }

    for node in model.nodes.values() {
        if !node.schema_is_consistent() {
            for (key, tag) in &node.data_out_schema {
                if node.data_in_schema.get(key) != Some(tag) {
                    return Err(ValidationError::SchemaNotSubset {
                        node_id: node.node_id.clone(),
                        key: key.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_types::{Edge, EdgeId, Node, NodeDecl, NodeId, TypeTag};
    use std::collections::BTreeMap;

    fn model_with_mismatched_edge() -> GraphModel {
        let a = Node::new(
            NodeId::new("a"),
            BTreeMap::new(),
            BTreeMap::from([("x".to_string(), TypeTag::Int)]),
        );
        let b = Node::new(NodeId::new("b"), BTreeMap::from([("x".to_string(), TypeTag::Str)]), BTreeMap::new());
        let edge = Edge {
            edge_id: EdgeId::new("e1"),
            src_node: a.node_id.clone(),
            dst_node: b.node_id.clone(),
            key_map: BTreeMap::from([("x".to_string(), "x".to_string())]),
        };
        GraphModel::from_parts(
            graph_types::GraphId::new("g"),
            vec![
                NodeDecl { node_id: a.node_id.clone(), data_in_schema: a.data_in_schema.clone(), data_out_schema: a.data_out_schema.clone() },
                NodeDecl { node_id: b.node_id.clone(), data_in_schema: b.data_in_schema.clone(), data_out_schema: b.data_out_schema.clone() },
            ],
            vec![edge],
        )
    }

    #[test]
    fn catches_type_mismatch_bypassing_edge_constructor() {
        let model = model_with_mismatched_edge();
        let err = validate(&model).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn empty_graph_is_valid() {
        let model = GraphModel::from_parts(graph_types::GraphId::new("g"), vec![], vec![]);
        assert!(validate(&model).is_ok());
    }
}
