//! Accounts and roles.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::EnumIter;

/// Role carried by an authenticated account.
///
/// The LMS backend is loose about this field; anything it sends that is not
/// one of the known roles is read as [`UserRole::Guest`].
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, EnumIter,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum UserRole {
    /// Signed in, but with no learner or instructor privileges.
    #[default]
    Guest,
    /// Learner account.
    Student,
    /// Account allowed into the instructor area.
    Instructor,
}

impl UserRole {
    /// Return the canonical string representation used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Student => "student",
            Self::Instructor => "instructor",
        }
    }

    /// Whether this role may open instructor-only pages.
    #[must_use]
    pub const fn is_instructor(self) -> bool {
        matches!(self, Self::Instructor)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            _ => Err("unknown user role"),
        }
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// The authenticated user as returned by the auth endpoints and persisted
/// under the `user` storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Backend identifier. Accepts the `_id` key used by the API.
    #[serde(alias = "_id")]
    pub id: String,

    /// Display/login name.
    pub username: String,

    /// Account email address.
    pub email: String,

    /// Role used for route gating. Missing on the wire means guest.
    #[serde(default)]
    pub role: UserRole,
}

impl Identity {
    /// Builds an identity record.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            role,
        }
    }
}
