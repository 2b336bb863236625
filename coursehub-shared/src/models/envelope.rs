//! The response envelope every endpoint answers with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Identity;

/// The uniform `{statusCode, message, data}` shape every API endpoint answers with.
///
/// `status_code` is application level; the API can answer HTTP 200 with a
/// failing code, so callers compare it against the code they expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    /// Application status code.
    pub status_code: u16,

    /// Message meant for the user.
    #[serde(default)]
    pub message: String,

    /// Operation specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// Creates an envelope without payload.
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            data: None,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Reads a login payload out of `data`, if there is a complete one.
    #[must_use]
    pub fn auth_payload(&self) -> Option<AuthPayload> {
        self.data
            .clone()
            .and_then(|data| serde_json::from_value::<AuthPayload>(data).ok())
            .filter(|payload| !payload.token.trim().is_empty())
    }
}

/// Credentials carried in a successful login envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthPayload {
    /// Opaque bearer token.
    #[serde(alias = "accessToken")]
    pub token: String,

    /// The signed-in user.
    pub user: Identity,
}
