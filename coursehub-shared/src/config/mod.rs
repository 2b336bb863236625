//! # Configuration
//!
//! Settings the web client needs at runtime: where the API lives, how long a
//! request may take, and where a successful sign-in lands.

pub mod client;

pub use client::{ClientConfig, ConfigError};
