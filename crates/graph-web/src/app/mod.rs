use std::sync::Arc;

use graph_sqlite::GraphRepository;

/// Shared axum handler state: a connection-pooled repository handle.
///
/// One `AppState` is built at startup and cloned into every request —
/// `Arc` makes the clone cheap and lets concurrent requests share the
/// repository without any lock around it, since `GraphRepository`
/// implementations open their own connection per call.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn GraphRepository + Send + Sync>,
}

impl AppState {
    pub fn new(repo: Arc<dyn GraphRepository + Send + Sync>) -> Self {
        Self { repo }
    }
}
