use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use sunauth_browser::Error as BrowserError;
use sunauth_core::Credentials;
use uuid::Uuid;

/// Issued sessions are reported as valid for this long; the source site never
/// refreshed them.
const SESSION_TTL_HOURS: i64 = 24;

/// Uniform error payload: `{ "success": false, "error": "..." }`.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    success: bool,
    session_id: String,
    session_data: String,
    token: String,
    expires_at: String,
}

/// POST /api/auth/google — run the scripted Google login and return the
/// harvested session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return api_error(StatusCode::BAD_REQUEST, "expected JSON body with email and password");
    };

    let credentials = resolve_credentials(&state, request);

    match sunauth_browser::authenticate(&state.config, &credentials).await {
        Ok(session) => (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                session_id: Uuid::new_v4().to_string(),
                session_data: session.session_data,
                token: session.token,
                expires_at: (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).to_rfc3339(),
            }),
        )
            .into_response(),
        Err(e) => {
            let status = match &e {
                BrowserError::MissingCredentials => StatusCode::BAD_REQUEST,
                BrowserError::ControlNotFound { .. }
                | BrowserError::NavigationTimeout { .. }
                | BrowserError::TokenNotFound => StatusCode::UNAUTHORIZED,
                BrowserError::Browser(_) | BrowserError::Cdp(_) | BrowserError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            api_error(status, e.to_string())
        }
    }
}

/// Request credentials win; an empty field falls back to the operator's
/// configured account, if any.
fn resolve_credentials(state: &AppState, request: LoginRequest) -> Credentials {
    let defaults = state.default_credentials.as_ref();

    let email = if request.email.trim().is_empty() {
        defaults.map(|d| d.email.clone()).unwrap_or(request.email)
    } else {
        request.email
    };
    let password = if request.password.trim().is_empty() {
        defaults
            .map(|d| d.password.clone())
            .unwrap_or(request.password)
    } else {
        request.password
    };

    Credentials::new(email, password)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    session_data: String,
}

/// POST /api/auth/verify — replay a session string and report validity.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "expected JSON body with string sessionData",
        );
    };

    let valid = sunauth_browser::verify_session(&state.config, &request.session_data).await;
    (StatusCode::OK, Json(json!({ "success": true, "valid": valid }))).into_response()
}

/// GET /api/auth/health — always healthy while the process is up.
pub async fn auth_health() -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "status": "ok" }))).into_response()
}

/// GET / — service identity.
pub async fn root() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "name": "Suno Authentication Service",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "online",
        })),
    )
        .into_response()
}

/// GET /health — liveness.
pub async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /api/debug — environment snapshot.
pub async fn debug_report(State(state): State<Arc<AppState>>) -> Response {
    let report = sunauth_browser::DebugReport::collect(&state.config);
    (StatusCode::OK, Json(report)).into_response()
}

/// POST /api/debug/browser — end-to-end browser capability check.
pub async fn debug_browser(State(state): State<Arc<AppState>>) -> Response {
    match sunauth_browser::browser_self_check(&state.config).await {
        Ok(report) => {
            (StatusCode::OK, Json(json!({ "success": true, "check": report }))).into_response()
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// JSON 404 for everything unrouted.
pub async fn not_found() -> Response {
    api_error(StatusCode::NOT_FOUND, "Route not found")
}
