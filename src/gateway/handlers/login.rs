use crate::{
    gateway::handlers::ApiResponse,
    provider::{AuthOutcome, IdentityProvider},
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/api/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = [ApiResponse], content_type = "application/json"),
        (status = 400, description = "Rejected by the identity provider", body = [ApiResponse]),
        (status = 500, description = "Request could not be processed", body = [ApiResponse]),
    ),
    tag= "login"
)]
// axum handler for login
#[instrument(skip(provider, payload))]
pub async fn login(
    provider: Extension<Arc<IdentityProvider>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let user: LoginRequest = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            error!("Error reading login payload: {}", rejection.body_text());

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::message(rejection.body_text())),
            );
        }
    };

    debug!("login request for {}", user.email);

    match provider
        .sign_in_with_password(&user.email, &user.password)
        .await
    {
        Ok(AuthOutcome::Granted(session)) => (
            StatusCode::OK,
            Json(ApiResponse {
                message: "Logged in successfully!".to_string(),
                email: Some(session.user.email),
                access_token: session.access_token,
            }),
        ),

        Ok(AuthOutcome::Rejected { message }) => {
            (StatusCode::BAD_REQUEST, Json(ApiResponse::message(message)))
        }

        Err(e) => {
            error!("Error calling identity provider: {:?}", e);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::message(e.to_string())),
            )
        }
    }
}
