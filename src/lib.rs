//! collab - read-only parser and consistency checker for pai-collab blackboards

pub mod artifact;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod journal;
pub mod manifest;
pub mod models;
pub mod output;
pub mod registry;
pub mod validation;

pub use error::CollabError;
pub use validation::{validate, ValidationReport};
