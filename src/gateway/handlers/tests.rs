//! Gateway handler tests.
//!
//! Each test drives the real router with `tower::ServiceExt::oneshot` against
//! a stub identity provider listening on an ephemeral local port, so the full
//! request path (extractors, provider client, response mapping) is exercised.

use crate::{cli::globals::GlobalArgs, gateway::router, provider::IdentityProvider};
use anyhow::Result;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    routing::post,
    Json, Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use uuid::Uuid;

async fn stub_signup(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["email"].as_str() {
        Some("taken@example.com") => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "msg": "User already registered" })),
        ),

        // only answers when the username made it through as metadata
        Some("meta@example.com") => {
            if body["data"]["username"].is_string() {
                (
                    StatusCode::OK,
                    Json(json!({ "id": Uuid::new_v4().to_string(), "email": "meta@example.com" })),
                )
            } else {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "msg": "missing username metadata" })),
                )
            }
        }

        Some(email) => (
            StatusCode::OK,
            Json(json!({ "id": Uuid::new_v4().to_string(), "email": email })),
        ),

        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "msg": "email is required" })),
        ),
    }
}

async fn stub_token(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some(email), Some("secret123")) => (
            StatusCode::OK,
            Json(json!({
                "access_token": "stub-access-token",
                "token_type": "bearer",
                "user": { "id": Uuid::new_v4().to_string(), "email": email }
            })),
        ),

        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })),
        ),
    }
}

async fn spawn_stub_provider() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let app = Router::new()
        .route("/auth/v1/signup", post(stub_signup))
        .route("/auth/v1/token", post(stub_token));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    Ok(format!("http://{addr}"))
}

fn gateway(provider_url: &str) -> Result<Router> {
    let mut globals = GlobalArgs::new(provider_url.to_string());
    globals.set_api_key(SecretString::from("test-api-key".to_string()));

    let provider = Arc::new(IdentityProvider::new(&globals)?);

    Ok(router(provider))
}

fn post_json(uri: &str, payload: &Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))?)
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn signup_created() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let payload = json!({ "email": "a@b.com", "password": "secret123" });
    let response = app.oneshot(post_json("/api/signup", &payload)?).await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(
        body,
        json!({ "message": "Account created successfully!", "email": "a@b.com" })
    );
    Ok(())
}

#[tokio::test]
async fn signup_provider_rejected() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let payload = json!({ "email": "taken@example.com", "password": "secret123" });
    let response = app.oneshot(post_json("/api/signup", &payload)?).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await?;
    assert_eq!(body, json!({ "message": "User already registered" }));
    Ok(())
}

#[tokio::test]
async fn signup_forwards_username_metadata() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let payload = json!({
        "email": "meta@example.com",
        "password": "secret123",
        "username": "neo"
    });
    let response = app.oneshot(post_json("/api/signup", &payload)?).await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["email"], "meta@example.com");
    Ok(())
}

#[tokio::test]
async fn login_rejected_with_provider_message() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let payload = json!({ "email": "a@b.com", "password": "wrong" });
    let response = app.oneshot(post_json("/api/login", &payload)?).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await?;
    assert_eq!(body, json!({ "message": "Invalid login credentials" }));
    Ok(())
}

#[tokio::test]
async fn login_success_returns_access_token() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let payload = json!({ "email": "a@b.com", "password": "secret123" });
    let response = app.oneshot(post_json("/api/login", &payload)?).await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["message"], "Logged in successfully!");
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["access_token"], "stub-access-token");
    Ok(())
}

#[tokio::test]
async fn login_is_idempotent() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let payload = json!({ "email": "a@b.com", "password": "wrong" });

    let first = app
        .clone()
        .oneshot(post_json("/api/login", &payload)?)
        .await?;
    let second = app.oneshot(post_json("/api/login", &payload)?).await?;

    assert_eq!(first.status(), second.status());
    assert_eq!(body_json(first).await?, body_json(second).await?);
    Ok(())
}

#[tokio::test]
async fn malformed_json_maps_to_internal_error() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await?;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(!message.is_empty(), "expected the parse failure text");
    Ok(())
}

#[tokio::test]
async fn unreachable_provider_maps_to_internal_error() -> Result<()> {
    // Grab a port that nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let dead_url = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let app = gateway(&dead_url)?;

    let payload = json!({ "email": "a@b.com", "password": "secret123" });
    let response = app.oneshot(post_json("/api/login", &payload)?).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await?;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(!message.is_empty(), "expected the transport failure text");
    Ok(())
}

#[tokio::test]
async fn health_reports_build_metadata() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));

    let body = body_json(response).await?;
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn root_banner() -> Result<()> {
    let provider_url = spawn_stub_provider().await?;
    let app = gateway(&provider_url)?;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
