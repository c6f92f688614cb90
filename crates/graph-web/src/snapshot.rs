//! Loads a persisted graph into the owned, in-memory `GraphModel`
//! snapshot that `graph-engine` executes against.

use graph_sqlite::{GraphRepository, RepoError};
use graph_types::{GraphId, GraphModel, NodeDecl};

/// Loads the graph's node set and every node's schema, then filters the
/// repository's global edge pool down to edges whose endpoints are both
/// in the graph — mirroring spec.md's framing that edges "are not
/// embedded in Graph; they live in a global pool."
///
/// Returns `Ok(None)` when the graph id does not exist, distinguishing
/// that case from a `RepoError` so callers can map it to `UnknownGraph`
/// rather than a storage failure.
pub fn load_snapshot(
    repo: &(dyn GraphRepository + Send + Sync),
    graph_id: &GraphId,
) -> Result<Option<GraphModel>, RepoError> {
    let Some(graph) = repo.load_graph(graph_id)? else {
        return Ok(None);
    };

    let mut decls = Vec::with_capacity(graph.nodes.len());
    for node_id in &graph.nodes {
        let Some(node) = repo.load_node(node_id)? else {
            // A graph referencing a node no longer in storage is a
            // repository-consistency problem, not a missing graph;
            // surface it the same way since there is no well-formed
            // snapshot to return.
            return Ok(None);
        };
        decls.push(NodeDecl {
            node_id: node.node_id,
            data_in_schema: node.data_in_schema,
            data_out_schema: node.data_out_schema,
        });
    }

    let edges = repo
        .load_edges()?
        .into_iter()
        .filter(|edge| graph.nodes.contains(&edge.src_node) && graph.nodes.contains(&edge.dst_node))
        .collect();

    Ok(Some(GraphModel::from_parts(graph_id.clone(), decls, edges)))
}
