use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use facet::Facet;
use graph_wire::ApiError;

pub fn json_ok<T>(value: &T) -> axum::response::Response
where
    T: for<'facet> Facet<'facet>,
{
    json_with_status(StatusCode::OK, value)
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    json_with_status(status, &ApiError::new(message))
}

pub fn json_with_status<T>(status: StatusCode, value: &T) -> axum::response::Response
where
    T: for<'facet> Facet<'facet>,
{
    match facet_json::to_string(value) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("json encode error: {error}"),
        )
            .into_response(),
    }
}
