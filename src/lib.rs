//! # Pordisto (Hosted Authentication Gateway)
//!
//! `pordisto` fronts a hosted identity provider with a pair of stateless
//! HTTP endpoints. It owns no credentials and issues no tokens: signup and
//! login payloads are forwarded to the provider's GoTrue-compatible REST API
//! and its verdict is reshaped into a small, stable response body.
//!
//! ## Request/response contract
//!
//! - `POST /api/signup` and `POST /api/login` accept a JSON credential pair
//!   and answer `200` with `{message, email}` on success, `400` with the
//!   provider's own error text when the provider rejects the request, and
//!   `500` with the failure text for anything unexpected (malformed body,
//!   network failure, surprising provider response).
//! - When the provider returns a session, its access token is passed through
//!   as the optional `access_token` field.
//!
//! ## Collaborators
//!
//! The only external collaborator is the identity provider, reached through
//! [`provider::IdentityProvider`] — an explicitly constructed client injected
//! into the handlers. The `db` CLI subcommands are operational diagnostics
//! against a Postgres instance and play no part in request serving.

pub mod cli;
pub mod gateway;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
