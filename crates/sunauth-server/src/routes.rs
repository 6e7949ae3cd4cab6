use crate::state::AppState;
use crate::{handlers, middleware::require_api_key};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full service router. The login and debug endpoints sit
/// behind the API-key gate; health and verification do not.
pub fn build_router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/api/auth/google", post(handlers::login))
        .route("/api/debug", get(handlers::debug_report))
        .route("/api/debug/browser", post(handlers::debug_browser))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .merge(gated)
        .route("/api/auth/verify", post(handlers::verify))
        .route("/api/auth/health", get(handlers::auth_health))
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
