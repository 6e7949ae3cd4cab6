use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use sunauth_core::{Credentials, ServiceConfig};
use sunauth_server::{build_router, AppState};
use tower::ServiceExt;

const TEST_API_KEY: &str = "test-key";

/// Router wired to a config whose Chrome path points nowhere, so no test can
/// accidentally launch a browser.
fn test_app() -> axum::Router {
    test_app_with_defaults(None)
}

fn test_app_with_defaults(default_credentials: Option<Credentials>) -> axum::Router {
    let mut config = ServiceConfig::new("https://suno.example");
    config.chrome_path = Some(PathBuf::from("/nonexistent/chrome"));

    build_router(Arc::new(AppState::new(
        config,
        TEST_API_KEY,
        default_credentials,
    )))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_login_without_api_key_is_unauthorized() {
    let response = test_app()
        .oneshot(post_json(
            "/api/auth/google",
            json!({ "email": "a@b.com", "password": "secret" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_login_with_wrong_api_key_is_unauthorized() {
    let mut request = post_json(
        "/api/auth/google",
        json!({ "email": "a@b.com", "password": "secret" }),
    );
    request
        .headers_mut()
        .insert("x-api-key", "wrong-key".parse().unwrap());

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_accepts_api_key_as_query_parameter() {
    // Malformed body on purpose: the key gate passes, validation rejects.
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/auth/google?apiKey={}", TEST_API_KEY))
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_malformed_body_is_bad_request() {
    let mut request = post_json("/api/auth/google", json!({ "email": "a@b.com" }));
    request
        .headers_mut()
        .insert("x-api-key", TEST_API_KEY.parse().unwrap());

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_blank_credentials_is_bad_request() {
    // No default credentials configured: blank fields fail the credential
    // check before any browser is launched.
    let mut request = post_json(
        "/api/auth/google",
        json!({ "email": "", "password": "" }),
    );
    request
        .headers_mut()
        .insert("x-api-key", TEST_API_KEY.parse().unwrap());

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("credentials"));
}

#[tokio::test]
async fn test_login_with_blank_credentials_falls_back_to_operator_account() {
    // With an operator account configured, blank body fields resolve to it
    // and the flow proceeds to the launcher, which fails on the nonexistent
    // Chrome path with 500 rather than rejecting the credentials with 400.
    let app = test_app_with_defaults(Some(Credentials::new("op@example.com", "op-secret")));

    let mut request = post_json("/api/auth/google", json!({ "email": "", "password": "" }));
    request
        .headers_mut()
        .insert("x-api-key", TEST_API_KEY.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("Chrome"));
}

#[tokio::test]
async fn test_login_browser_environment_failure_is_internal_error() {
    // Complete credentials pass validation; the missing Chrome binary is an
    // environment failure and maps to 500, not 401.
    let mut request = post_json(
        "/api/auth/google",
        json!({ "email": "a@b.com", "password": "secret" }),
    );
    request
        .headers_mut()
        .insert("x-api-key", TEST_API_KEY.parse().unwrap());

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_verify_with_non_string_session_data_is_bad_request() {
    let response = test_app()
        .oneshot(post_json("/api/auth/verify", json!({ "sessionData": 42 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verify_with_blank_session_data_reports_invalid() {
    let response = test_app()
        .oneshot(post_json("/api/auth/verify", json!({ "sessionData": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["valid"], json!(false));
}

#[tokio::test]
async fn test_auth_health_is_always_ok() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/auth/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_root_reports_service_identity() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("online"));
    assert!(body["name"].as_str().unwrap().contains("Suno"));
}

#[tokio::test]
async fn test_health_liveness() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn test_debug_endpoint_requires_api_key() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/debug")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_debug_endpoint_returns_report_with_key() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/debug")
                .header("x-api-key", TEST_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.get("platform").is_some());
    assert!(body.get("chrome_candidates").is_some());
}

#[tokio::test]
async fn test_unknown_route_gets_json_404() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Route not found"));
}
