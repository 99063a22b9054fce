//! Client for the hosted identity provider.
//!
//! Speaks the GoTrue-compatible REST surface (Supabase auth and friends):
//! `POST /auth/v1/signup` and `POST /auth/v1/token?grant_type=password`.
//! The client is constructed once at startup and injected into the handlers;
//! it holds the provider base URL, the API key and a reqwest client with the
//! crate user agent and a request timeout.
//!
//! Provider verdicts are normalized into [`AuthOutcome`]: an explicit 4xx
//! answer from the provider becomes `Rejected` with the provider's own
//! message, anything else that goes wrong (network failure, 5xx, response
//! shape surprises) surfaces as an `Err`.

use crate::{cli::globals::GlobalArgs, APP_USER_AGENT};
use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of an authentication call against the provider.
#[derive(Debug)]
pub enum AuthOutcome {
    /// The provider accepted the request and returned a user (and possibly a session).
    Granted(Session),
    /// The provider explicitly refused the request; `message` is its error text.
    Rejected { message: String },
}

#[derive(Debug)]
pub struct AuthUser {
    pub id: Option<Uuid>,
    pub email: String,
}

#[derive(Debug)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: Option<String>,
}

#[derive(Debug)]
pub struct IdentityProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

#[instrument]
pub fn endpoint_url(base_url: &str, endpoint: &str) -> Result<String> {
    let url = Url::parse(base_url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {}", scheme)),
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{endpoint}");

    debug!("endpoint URL: {}", endpoint);

    Ok(endpoint_url)
}

impl IdentityProvider {
    /// Build a provider client from the global arguments.
    ///
    /// # Errors
    /// Returns an error if the reqwest client cannot be constructed.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: globals.provider_url.clone(),
            api_key: globals.provider_api_key.clone(),
        })
    }

    /// Register a new account with the provider.
    ///
    /// `username`, when present, travels as signup metadata; the provider owns
    /// whatever profile record comes out of it.
    ///
    /// # Errors
    /// Returns an error on transport failures or unexpected provider responses.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<AuthOutcome> {
        let signup_url = endpoint_url(&self.base_url, "/auth/v1/signup")?;

        let mut payload = json!({
            "email": email,
            "password": password,
        });

        if let Some(username) = username {
            payload["data"] = json!({ "username": username });
        }

        self.auth_request(&signup_url, &payload).await
    }

    /// Authenticate an email/password pair against the provider.
    ///
    /// # Errors
    /// Returns an error on transport failures or unexpected provider responses.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        let token_url = endpoint_url(&self.base_url, "/auth/v1/token?grant_type=password")?;

        let payload = json!({
            "email": email,
            "password": password,
        });

        self.auth_request(&token_url, &payload).await
    }

    async fn auth_request(&self, url: &str, payload: &Value) -> Result<AuthOutcome> {
        let response = self
            .client
            .post(url)
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(self.api_key.expose_secret())
            .json(payload)
            .send()
            .await
            .context("Failed to reach identity provider")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read identity provider response")?;

        let json_response: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(AuthOutcome::Granted(parse_session(&json_response)?));
        }

        if status.is_client_error() {
            let message = rejection_message(status, &json_response, &body);

            error!("provider rejected request: {} - {}", status, message);

            return Ok(AuthOutcome::Rejected { message });
        }

        Err(anyhow!(
            "{} - {}, {}",
            url,
            status,
            rejection_message(status, &json_response, &body)
        ))
    }
}

// GoTrue spells its error text differently across endpoints and versions.
fn rejection_message(status: StatusCode, json: &Value, raw: &str) -> String {
    for key in ["error_description", "msg", "message", "error"] {
        if let Some(message) = json[key].as_str() {
            return message.to_string();
        }
    }

    let raw = raw.trim();
    if raw.is_empty() {
        format!("authentication request failed with status {status}")
    } else {
        raw.to_string()
    }
}

// The user object arrives either at the top level (signup pending
// confirmation) or nested under "user" alongside an access token.
fn parse_session(json: &Value) -> Result<Session> {
    let user = if json["user"].is_object() {
        &json["user"]
    } else {
        json
    };

    let email = user["email"]
        .as_str()
        .ok_or_else(|| anyhow!("Error parsing JSON response: no email found"))?;

    let id = user["id"].as_str().and_then(|s| Uuid::parse_str(s).ok());

    let access_token = json["access_token"].as_str().map(ToString::to_string);

    Ok(Session {
        user: AuthUser {
            id,
            email: email.to_string(),
        },
        access_token,
    })
}
