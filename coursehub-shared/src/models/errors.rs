//! Error bodies.

use serde::{Deserialize, Serialize};

/// Failure body returned by the API alongside a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human readable reason, shown to the user verbatim.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Creates an error body with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The server message, if it carried a non-blank one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message().unwrap_or("unknown error"))
    }
}

impl std::error::Error for ErrorBody {}
