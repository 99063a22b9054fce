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
pub struct SignupRequest {
    email: String,
    password: String,
    username: Option<String>,
}

#[utoipa::path(
    post,
    path= "/api/signup",
    request_body = SignupRequest,
    responses (
        (status = 200, description = "Account created", body = [ApiResponse], content_type = "application/json"),
        (status = 400, description = "Rejected by the identity provider", body = [ApiResponse]),
        (status = 500, description = "Request could not be processed", body = [ApiResponse]),
    ),
    tag= "signup"
)]
// axum handler for signup
#[instrument(skip(provider, payload))]
pub async fn signup(
    provider: Extension<Arc<IdentityProvider>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> impl IntoResponse {
    let user: SignupRequest = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            error!("Error reading signup payload: {}", rejection.body_text());

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::message(rejection.body_text())),
            );
        }
    };

    debug!("signup request for {}", user.email);

    // Email/password validation belongs to the provider; the gateway only forwards.
    match provider
        .sign_up(&user.email, &user.password, user.username.as_deref())
        .await
    {
        Ok(AuthOutcome::Granted(session)) => (
            StatusCode::OK,
            Json(ApiResponse {
                message: "Account created successfully!".to_string(),
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
