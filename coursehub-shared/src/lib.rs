#![cfg_attr(not(test), forbid(unsafe_code))]

//! Wire models and configuration shared by the CourseHub client crates.

pub mod config;
pub mod models;
