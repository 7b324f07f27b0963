//! mergebot: branch automerge for dependency update branches.
//!
//! The core of the crate is [`automerge::try_branch_automerge`], a small
//! decision pipeline that checks whether an update branch may be merged
//! directly into its base branch and, if so, merges it. Platform access
//! goes through the [`platform::PlatformService`] trait, implemented for
//! GitHub and GitLab.

pub mod auth;
pub mod automerge;
pub mod config;
pub mod emoji;
pub mod error;
pub mod platform;
pub mod types;
