pub mod health;
pub use self::health::health;

pub mod signup;
pub use self::signup::signup;

pub mod login;
pub use self::login::login;

#[cfg(test)]
mod tests;

// common response body for the auth handlers
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized gateway answer: a message, plus the account email and the
/// provider's access token when the call succeeded. Optional fields are
/// dropped from the JSON body entirely when absent.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ApiResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl ApiResponse {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            email: None,
            access_token: None,
        }
    }
}
