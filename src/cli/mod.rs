//! CLI command implementations

pub mod auth;
pub mod automerge;
pub mod context;
pub mod style;
