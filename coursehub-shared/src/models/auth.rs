//! Request bodies for the account endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Lower-cased email.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

/// Body of `POST auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    /// Lower-cased username.
    pub username: String,
    /// Lower-cased email.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

/// Body of `POST auth/forgot-password`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForgotPasswordRequest {
    /// Address the reset link is mailed to.
    pub email: String,
}

/// Body of `POST auth/resetpassword`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// The replacement password.
    pub new_password: String,
    /// Reset token taken from the emailed link.
    pub token: String,
}
