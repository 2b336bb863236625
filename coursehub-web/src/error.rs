//! Failures a submission attempt can end in.

use std::time::Duration;
use thiserror::Error;

/// Shown when nothing more specific is known.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown when the request exceeded the configured timeout.
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";

/// The request never produced a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, CORS or body read failure.
    #[error("network error: {0}")]
    Network(String),

    /// No response within the allowed time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Why a submission attempt ended in the failed phase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// See [`TransportError`].
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered but did not report the expected status.
    ///
    /// `status` is the HTTP status for non-2xx answers and the envelope's
    /// application code otherwise.
    #[error("server rejected the request with status {status}")]
    Application {
        /// Failing status code.
        status: u16,
        /// Server-supplied text, if it sent any.
        message: Option<String>,
    },
}

impl SubmitError {
    /// Text to surface to the user: the server's own message when there is
    /// one, otherwise a generic or timeout-specific fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Application {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Transport(TransportError::Timeout(_)) => TIMEOUT_MESSAGE.to_string(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Whether the server refused the credentials attached to the request.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Application { status: 401, .. })
    }
}
