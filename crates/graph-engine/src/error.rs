use std::fmt;

use graph_types::{EdgeId, NodeId};

/// A static well-formedness failure found by [`crate::validator::validate`].
///
/// Distinct from [`crate::ExecutionOutcome`]'s diagnoses: a validation
/// error means the stored graph itself is malformed (should not be
/// reachable once CRUD-time checks are in place, but the engine re-checks
/// rather than trusting storage); an `ExecutionOutcome` variant means the
/// graph is well-formed but this particular run's structure or inputs are
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnknownNode { edge_id: EdgeId, node_id: NodeId },
    UnknownSourceKey { edge_id: EdgeId, key: String },
    UnknownDestKey { edge_id: EdgeId, key: String },
    TypeMismatch { edge_id: EdgeId, src_key: String, dst_key: String },
    SchemaNotSubset { node_id: NodeId, key: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownNode { edge_id, node_id } => {
                write!(f, "edge '{edge_id}' references unknown node '{node_id}'")
            }
            ValidationError::UnknownSourceKey { edge_id, key } => {
                write!(f, "edge '{edge_id}' maps unknown source output key '{key}'")
            }
            ValidationError::UnknownDestKey { edge_id, key } => {
                write!(f, "edge '{edge_id}' maps unknown destination input key '{key}'")
            }
            ValidationError::TypeMismatch { edge_id, src_key, dst_key } => {
                write!(
                    f,
                    "edge '{edge_id}' maps '{src_key}' -> '{dst_key}' with mismatched type tags"
                )
            }
            ValidationError::SchemaNotSubset { node_id, key } => {
                write!(
                    f,
                    "node '{node_id}' has output key '{key}' not present in its input schema with the same tag"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
