use facet::Facet;

/// Body of every non-2xx CRUD response: `{"error": "..."}`.
#[derive(Facet, Debug, Clone)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}
