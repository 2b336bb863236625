#![cfg_attr(not(test), forbid(unsafe_code))]
//! Session & validated-submission pipeline for the CourseHub web client.
//!
//! - [`session`] owns the signed-in identity and its token.
//! - [`guard`] decides whether a page may render for that session.
//! - [`validation`] and [`submission`] run every form through
//!   validate → send → interpret → notify.
//! - [`actions`] pairs session changes with navigation.
//! - [`forms`] lists the client's forms as table entries.

pub mod actions;
pub mod api;
pub mod app;
pub mod components;
pub mod error;
pub mod forms;
pub mod guard;
pub mod navigation;
pub mod routes;
pub mod session;
pub mod storage;
pub mod submission;
#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
pub mod validation;

#[cfg(test)]
mod test_support;
