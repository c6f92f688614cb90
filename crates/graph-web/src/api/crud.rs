//! `/crud/*` handlers: static, pre-execution creation and inspection of
//! nodes, edges, and graphs. Type-string compatibility checks here are
//! the "static CRUD validation on creation" spec.md calls an external
//! collaborator — `graph-engine` re-validates the loaded snapshot before
//! every run regardless, so these checks exist to fail fast and to keep
//! bad data out of storage in the first place.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use graph_sqlite::GraphRepository;
use graph_types::{Edge, EdgeBuildError, Graph, GraphId, Node};
use graph_wire::{
    CreateEdgeRequest, CreateEdgeResponse, CreateGraphRequest, CreateGraphResponse,
    CreateNodeRequest, CreateNodeResponse, EdgeAdjacency, EdgeWire,
    GetGraphRequest, GetGraphResponse, NodeAdjacency,
};

use crate::app::AppState;
use crate::util::http::{json_error, json_ok};

pub async fn create_nodes(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request: CreateNodeRequest = match facet_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => return json_error(StatusCode::BAD_REQUEST, format!("invalid request json: {error}")),
    };

    if request.node_id.as_str().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "node_id must not be empty");
    }
    for (key, tag) in &request.data_out {
        match request.data_in.get(key) {
            None => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    format!("data_out key '{key}' is not present in data_in"),
                );
            }
            Some(in_tag) if in_tag != tag => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    format!("data_out key '{key}' has tag {tag:?} but data_in declares {in_tag:?}"),
                );
            }
            Some(_) => {}
        }
    }

    let node_id = request.node_id.clone();
    let node = Node::new(request.node_id, request.data_in, request.data_out);
    let repo = state.repo.clone();
    match tokio::task::spawn_blocking(move || repo.save_node(&node)).await {
        Ok(Ok(())) => json_with_201(&CreateNodeResponse {
            message: "node created".to_string(),
            node_id,
        }),
        Ok(Err(error)) => json_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        Err(error) => json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker join error: {error}")),
    }
}

pub async fn create_edges(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request: CreateEdgeRequest = match facet_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => return json_error(StatusCode::BAD_REQUEST, format!("invalid request json: {error}")),
    };

    if request.edge_id.as_str().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "edge_id must not be empty");
    }

    let repo = state.repo.clone();
    let outcome = tokio::task::spawn_blocking(move || build_and_save_edge(repo, request)).await;
    match outcome {
        Ok(Ok(response)) => json_with_201(&response),
        Ok(Err((status, message))) => json_error(status, message),
        Err(error) => json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker join error: {error}")),
    }
}

fn build_and_save_edge(
    repo: Arc<dyn GraphRepository + Send + Sync>,
    request: CreateEdgeRequest,
) -> Result<CreateEdgeResponse, (StatusCode, String)> {
    let src = repo
        .load_node(&request.src_node)
        .map_err(|error| (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown src_node '{}'", request.src_node)))?;
    let dst = repo
        .load_node(&request.dst_node)
        .map_err(|error| (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown dst_node '{}'", request.dst_node)))?;

    let edge = Edge::new(request.edge_id.clone(), &src, &dst, request.src_to_dst_data_keys)
        .map_err(|error| (StatusCode::BAD_REQUEST, edge_build_error_message(&error)))?;

    repo.save_edge(&edge).map_err(|error| (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()))?;

    Ok(CreateEdgeResponse { message: "edge created".to_string(), edge_id: edge.edge_id })
}

fn edge_build_error_message(error: &EdgeBuildError) -> String {
    error.to_string()
}

pub async fn create_graph(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request: CreateGraphRequest = match facet_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => return json_error(StatusCode::BAD_REQUEST, format!("invalid request json: {error}")),
    };

    let repo = state.repo.clone();
    let outcome = tokio::task::spawn_blocking(move || build_and_save_graph(repo, request)).await;
    match outcome {
        Ok(Ok(response)) => json_with_201(&response),
        Ok(Err((status, message))) => json_error(status, message),
        Err(error) => json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker join error: {error}")),
    }
}

fn build_and_save_graph(
    repo: Arc<dyn GraphRepository + Send + Sync>,
    request: CreateGraphRequest,
) -> Result<CreateGraphResponse, (StatusCode, String)> {
    let mut nodes = BTreeSet::new();
    for node_id in request.nodes {
        let exists = repo
            .load_node(&node_id)
            .map_err(|error| (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()))?
            .is_some();
        if !exists {
            return Err((StatusCode::NOT_FOUND, format!("unknown node '{node_id}'")));
        }
        nodes.insert(node_id);
    }

    let graph = Graph { graph_id: request.graph_id.clone(), nodes };
    repo.save_graph(&graph).map_err(|error| (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()))?;

    Ok(CreateGraphResponse { message: "graph created".to_string(), graph_id: request.graph_id })
}

pub async fn get_graph(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request: GetGraphRequest = match facet_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => return json_error(StatusCode::BAD_REQUEST, format!("invalid request json: {error}")),
    };

    let repo = state.repo.clone();
    let outcome = tokio::task::spawn_blocking(move || load_adjacency(&*repo, &request.graph_id)).await;
    match outcome {
        Ok(Ok(Some(response))) => json_ok(&response),
        Ok(Ok(None)) => json_error(StatusCode::NOT_FOUND, format!("unknown graph '{}'", request.graph_id)),
        Ok(Err(error)) => json_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        Err(error) => json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker join error: {error}")),
    }
}

fn load_adjacency(
    repo: &(dyn GraphRepository + Send + Sync),
    graph_id: &GraphId,
) -> Result<Option<GetGraphResponse>, graph_sqlite::RepoError> {
    let Some(graph) = repo.load_graph(graph_id)? else {
        return Ok(None);
    };

    let mut nodes = std::collections::BTreeMap::new();
    for node_id in &graph.nodes {
        if let Some(node) = repo.load_node(node_id)? {
            nodes.insert(node_id.clone(), node);
        }
    }

    let all_edges = repo.load_edges()?;
    let mut response = GetGraphResponse::new();
    for (node_id, node) in &nodes {
        let edges = all_edges
            .iter()
            .filter(|edge| &edge.src_node == node_id && graph.nodes.contains(&edge.dst_node))
            .filter_map(|edge| {
                nodes.get(&edge.dst_node).map(|dst| EdgeAdjacency {
                    dst_node: edge.dst_node.clone(),
                    data_in: dst.data_in_schema.clone(),
                    data_out: dst.data_out_schema.clone(),
                })
            })
            .collect();
        response.insert(
            node_id.to_string(),
            NodeAdjacency {
                data_in: node.data_in_schema.clone(),
                data_out: node.data_out_schema.clone(),
                edges,
            },
        );
    }
    Ok(Some(response))
}

pub async fn get_edges(State(state): State<AppState>) -> impl IntoResponse {
    let repo = state.repo.clone();
    match tokio::task::spawn_blocking(move || repo.load_edges()).await {
        Ok(Ok(edges)) => {
            let edges: Vec<EdgeWire> = edges
                .into_iter()
                .map(|edge| EdgeWire {
                    edge_id: edge.edge_id,
                    src_node: edge.src_node,
                    dst_node: edge.dst_node,
                    src_to_dst_data_keys: edge.key_map,
                })
                .collect();
            json_ok(&edges)
        }
        Ok(Err(error)) => json_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        Err(error) => json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker join error: {error}")),
    }
}

fn json_with_201<T>(value: &T) -> axum::response::Response
where
    T: for<'facet> facet::Facet<'facet>,
{
    crate::util::http::json_with_status(StatusCode::CREATED, value)
}
