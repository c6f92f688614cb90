pub mod crud;
pub mod run;

use axum::Router;
use axum::routing::{get, post};

use crate::app::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/crud/create_nodes", post(crud::create_nodes))
        .route("/crud/create_edges", post(crud::create_edges))
        .route("/crud/create_graph", post(crud::create_graph))
        .route("/crud/get_graph", post(crud::get_graph))
        .route("/crud/get_edges", get(crud::get_edges))
        .route("/graph/process_graph", post(run::process_graph))
        .route("/graph/graph_run_config", post(run::process_graph))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "{\"status\":\"ok\"}"
}
