use crate::{
    gateway::handlers::{
        health, health::__path_health, login, login::__path_login, signup, signup::__path_signup,
    },
    provider::IdentityProvider,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(health, signup, login),
    components(schemas(
        health::Health,
        signup::SignupRequest,
        login::LoginRequest,
        handlers::ApiResponse
    )),
    tags(
        (name = "pordisto", description = "Hosted authentication gateway API")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the gateway router around an injected provider client.
#[must_use]
pub fn router(provider: Arc<IdentityProvider>) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route("/", get(|| async { "🚪" }))
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(provider)),
        )
        .route("/health", get(handlers::health).options(handlers::health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi()))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, provider: Arc<IdentityProvider>) -> Result<()> {
    let app = router(provider);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Gracefully shutdown");
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
