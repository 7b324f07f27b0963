//! Error types for mergebot

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across mergebot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Run configuration could not be located, read, or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// No usable authentication token for the target platform.
    #[error("auth error: {0}")]
    Auth(String),

    /// GitHub API call failed.
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GitLab API call failed.
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Platform-agnostic service error (also used by test doubles).
    #[error("platform error: {0}")]
    Platform(String),

    /// Remote URL does not belong to a supported platform.
    #[error("unsupported remote: {0} (expected GitHub or GitLab)")]
    UnsupportedRemote(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// Error from the octocrab GitHub client.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Error from the underlying HTTP client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
