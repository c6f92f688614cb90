use std::collections::{BTreeMap, BTreeSet};

use facet::Facet;

use crate::ids::NodeId;
use crate::tag::TypeTag;
use crate::value::Value;

/// A node's typed input/output schema plus its current value maps.
///
/// `data_out_schema` is corrected on construction so that it is always a
/// tag-preserving subset of `data_in_schema`: any `data_in_schema` key
/// absent from `data_out_schema` is copied over with the same tag. Nodes
/// are pure conduits — they forward values, they do not invent new output
/// keys — so this correction makes the subset invariant hold by
/// construction rather than requiring every caller to get it right.
#[derive(Facet, Clone, Debug)]
pub struct Node {
    pub node_id: NodeId,
    pub data_in_schema: BTreeMap<String, TypeTag>,
    pub data_out_schema: BTreeMap<String, TypeTag>,
    pub data_in: BTreeMap<String, Value>,
    pub data_out: BTreeMap<String, Value>,

    /// Scheduled level, -1 until the scheduler assigns one.
    pub level: i64,
    pub visited: bool,
    /// Predecessor node ids, derived from the edge pool at build time.
    pub incoming_sources: BTreeSet<NodeId>,
}

impl Node {
    pub fn new(
        node_id: NodeId,
        data_in_schema: BTreeMap<String, TypeTag>,
        mut data_out_schema: BTreeMap<String, TypeTag>,
    ) -> Self {
        for (key, tag) in &data_in_schema {
            data_out_schema.entry(key.clone()).or_insert(*tag);
        }

        let data_in = data_in_schema.keys().cloned().map(|k| (k, Value::Unset)).collect();
        let data_out = data_out_schema
            .keys()
            .cloned()
            .map(|k| (k, Value::Unset))
            .collect();

        Self {
            node_id,
            data_in_schema,
            data_out_schema,
            data_in,
            data_out,
            level: -1,
            visited: false,
            incoming_sources: BTreeSet::new(),
        }
    }

    /// `true` iff `data_out_schema` is a tag-preserving subset of
    /// `data_in_schema`. Always true for nodes built via [`Node::new`];
    /// exposed for [`crate::Graph`] validation of nodes loaded from
    /// storage, which may predate this correction.
    pub fn schema_is_consistent(&self) -> bool {
        self.data_out_schema
            .iter()
            .all(|(key, tag)| self.data_in_schema.get(key) == Some(tag))
    }

    /// `true` iff this node has no recorded predecessors — a root of the
    /// (possibly pruned) graph it belongs to.
    pub fn is_root(&self) -> bool {
        self.incoming_sources.is_empty()
    }
}
