use crate::handlers::api_error;
use crate::state::AppState;
use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::sync::Arc;

/// Gate a route on the service API key, taken from the `x-api-key` header or
/// an `apiKey` query parameter. Rejects before the body is ever touched.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| params.get("apiKey").cloned());

    match presented {
        Some(key) if !state.api_key.is_empty() && key == state.api_key => next.run(request).await,
        _ => {
            tracing::warn!(path = %request.uri().path(), "rejected request with invalid API key");
            api_error(StatusCode::UNAUTHORIZED, "Unauthorized: invalid API key")
        }
    }
}
