//! Wire models exchanged with the LMS API.

pub mod auth;
pub mod course;
pub mod envelope;
pub mod errors;
pub mod user;

pub use auth::{ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest};
pub use course::CourseRequest;
pub use envelope::{ApiEnvelope, AuthPayload};
pub use errors::ErrorBody;
pub use user::{Identity, UserRole};
