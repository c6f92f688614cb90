use std::collections::BTreeMap;
use std::fmt;

use facet::Facet;

use crate::ids::{EdgeId, NodeId};
use crate::node::Node;

/// A directed connection between two nodes, mapping specific output keys of
/// the source to specific input keys of the destination.
#[derive(Facet, Clone, Debug)]
pub struct Edge {
    pub edge_id: EdgeId,
    pub src_node: NodeId,
    pub dst_node: NodeId,
    /// source-output key -> destination-input key.
    pub key_map: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeBuildError {
    UnknownSourceKey { key: String },
    UnknownDestKey { key: String },
    TypeMismatch { src_key: String, dst_key: String },
}

impl fmt::Display for EdgeBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeBuildError::UnknownSourceKey { key } => {
                write!(f, "source output key '{key}' is not in the source's data_out_schema")
            }
            EdgeBuildError::UnknownDestKey { key } => {
                write!(f, "destination input key '{key}' is not in the destination's data_in_schema")
            }
            EdgeBuildError::TypeMismatch { src_key, dst_key } => {
                write!(f, "type tags disagree between source key '{src_key}' and destination key '{dst_key}'")
            }
        }
    }
}

impl std::error::Error for EdgeBuildError {}

impl Edge {
    /// Builds an edge, enforcing at creation time that every `(s, d)` pair
    /// in `key_map` is well-typed: `s` exists in `src.data_out_schema`, `d`
    /// exists in `dst.data_in_schema`, and their tags agree.
    pub fn new(
        edge_id: EdgeId,
        src: &Node,
        dst: &Node,
        key_map: BTreeMap<String, String>,
    ) -> Result<Self, EdgeBuildError> {
        for (src_key, dst_key) in &key_map {
            let src_tag = src
                .data_out_schema
                .get(src_key)
                .ok_or_else(|| EdgeBuildError::UnknownSourceKey { key: src_key.clone() })?;
            let dst_tag = dst
                .data_in_schema
                .get(dst_key)
                .ok_or_else(|| EdgeBuildError::UnknownDestKey { key: dst_key.clone() })?;
            if src_tag != dst_tag {
                return Err(EdgeBuildError::TypeMismatch {
                    src_key: src_key.clone(),
                    dst_key: dst_key.clone(),
                });
            }
        }

        Ok(Self {
            edge_id,
            src_node: src.node_id.clone(),
            dst_node: dst.node_id.clone(),
            key_map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TypeTag;
    use std::collections::BTreeMap as Map;

    fn node(id: &str, in_tags: &[(&str, TypeTag)], out_tags: &[(&str, TypeTag)]) -> Node {
        let in_schema: Map<String, TypeTag> = in_tags.iter().map(|(k, t)| (k.to_string(), *t)).collect();
        let out_schema: Map<String, TypeTag> = out_tags.iter().map(|(k, t)| (k.to_string(), *t)).collect();
        Node::new(NodeId::new(id), in_schema, out_schema)
    }

    #[test]
    fn rejects_unknown_source_key() {
        let src = node("a", &[], &[]);
        let dst = node("b", &[("x", TypeTag::Int)], &[]);
        let key_map = Map::from([("x".to_string(), "x".to_string())]);
        let err = Edge::new(EdgeId::new("e"), &src, &dst, key_map).unwrap_err();
        assert_eq!(err, EdgeBuildError::UnknownSourceKey { key: "x".into() });
    }

    #[test]
    fn rejects_type_mismatch() {
        let src = node("a", &[("x", TypeTag::Int)], &[("x", TypeTag::Int)]);
        let dst = node("b", &[("x", TypeTag::Str)], &[]);
        let key_map = Map::from([("x".to_string(), "x".to_string())]);
        let err = Edge::new(EdgeId::new("e"), &src, &dst, key_map).unwrap_err();
        assert_eq!(
            err,
            EdgeBuildError::TypeMismatch { src_key: "x".into(), dst_key: "x".into() }
        );
    }

    #[test]
    fn accepts_well_typed_mapping() {
        let src = node("a", &[("x", TypeTag::Int)], &[("x", TypeTag::Int)]);
        let dst = node("b", &[("x", TypeTag::Int)], &[]);
        let key_map = Map::from([("x".to_string(), "x".to_string())]);
        assert!(Edge::new(EdgeId::new("e"), &src, &dst, key_map).is_ok());
    }
}
