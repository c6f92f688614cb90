use std::collections::BTreeMap;

use graph_types::{GraphModel, NodeId, RunConfig, Value};

use crate::error::ValidationError;
use crate::{propagator, run_config, scheduler, structure, validator};

/// Final recorded state of one node after a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub level: i64,
    pub visited: bool,
    pub data_in: BTreeMap<String, Value>,
    pub data_out: BTreeMap<String, Value>,
}

/// The one outcome of [`execute`] — always a value, never a transport
/// error. `Invalid` carries the specific static-validation failure so the
/// caller can map it to the right status code; `Cycle`/`Islands`/`NotARoot`
/// are valid diagnoses of the submitted graph and run configuration, not
/// failures of the engine itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Invalid(ValidationError),
    Cycle,
    Islands,
    NotARoot,
    Completed(BTreeMap<NodeId, NodeState>),
}

/// Runs one request against an owned graph snapshot: apply run config,
/// check root admissibility, validate, check structure, schedule,
/// propagate, and collect final per-node state. The snapshot is consumed
/// and discarded — nothing here is ever written back to storage.
pub fn execute(mut model: GraphModel, config: &RunConfig) -> ExecutionOutcome {
    run_config::apply(&mut model, config);

    if run_config::check_root_admissibility(&model, config).is_err() {
        return ExecutionOutcome::NotARoot;
    }

    if let Err(error) = validator::validate(&model) {
        return ExecutionOutcome::Invalid(error);
    }

    if structure::detect_cycle(&model).is_err() {
        return ExecutionOutcome::Cycle;
    }

    if structure::check_connected(&model).is_err() {
        return ExecutionOutcome::Islands;
    }

    let levels = scheduler::schedule(&mut model);
    propagator::propagate(&mut model, &levels);

    let state = model
        .nodes
        .into_iter()
        .map(|(node_id, node)| {
            (
                node_id,
                NodeState {
                    level: node.level,
                    visited: node.visited,
                    data_in: node.data_in,
                    data_out: node.data_out,
                },
            )
        })
        .collect();

    ExecutionOutcome::Completed(state)
}
