//! `POST /graph/process_graph` (and its alias `/graph/graph_run_config`).
//!
//! Sequences load -> apply run config -> validate -> schedule ->
//! propagate -> serialize, per `ExecutionService`'s contract
//! (`graph_engine::execute`). Every outcome except malformed JSON and an
//! unknown `graph_id` answers `200`: the cycle/islands/not-a-root
//! diagnoses are valid results of a submitted run, not transport errors.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use graph_engine::ExecutionOutcome;
use graph_wire::{ExecutionResultMessage, NodeStateWire, ProcessGraphResponse, RunConfigRequest};

use crate::app::AppState;
use crate::snapshot::load_snapshot;
use crate::util::http::{json_error, json_with_status};

pub async fn process_graph(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request: RunConfigRequest = match facet_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => return json_error(StatusCode::BAD_REQUEST, format!("invalid request json: {error}")),
    };

    let repo = state.repo.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let run_config = request.into_run_config();
        let model = load_snapshot(&*repo, &run_config.graph_id)?;
        Ok::<_, graph_sqlite::RepoError>(model.map(|model| graph_engine::execute(model, &run_config)))
    })
    .await;

    match outcome {
        Ok(Ok(Some(outcome))) => render_outcome(outcome),
        Ok(Ok(None)) => json_error(StatusCode::NOT_FOUND, "unknown graph_id"),
        Ok(Err(error)) => json_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        Err(error) => json_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker join error: {error}")),
    }
}

fn render_outcome(outcome: ExecutionOutcome) -> axum::response::Response {
    match outcome {
        ExecutionOutcome::Invalid(error) => json_error(StatusCode::BAD_REQUEST, error.to_string()),
        ExecutionOutcome::Cycle => {
            json_with_status(StatusCode::OK, &ExecutionResultMessage::new(ExecutionResultMessage::CYCLE))
        }
        ExecutionOutcome::Islands => {
            json_with_status(StatusCode::OK, &ExecutionResultMessage::new(ExecutionResultMessage::ISLANDS))
        }
        ExecutionOutcome::NotARoot => {
            json_with_status(StatusCode::OK, &ExecutionResultMessage::new(ExecutionResultMessage::NOT_A_ROOT))
        }
        ExecutionOutcome::Completed(state) => {
            let response: ProcessGraphResponse = state
                .into_iter()
                .map(|(node_id, node_state)| {
                    (
                        node_id.to_string(),
                        NodeStateWire {
                            level: node_state.level,
                            visited: node_state.visited,
                            data_in: node_state.data_in,
                            data_out: node_state.data_out,
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>();
            json_with_status(StatusCode::OK, &response)
        }
    }
}
