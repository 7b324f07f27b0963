//! Core types for mergebot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate CI result for a branch.
///
/// Collapsed from whatever check systems the platform runs: anything still
/// in flight (or not configured) is `Pending`, a definitive red check is
/// `Failure`, and `Success` means every configured check passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchStatus {
    /// Checks are still running, queued, or not configured.
    Pending,
    /// All configured checks passed.
    Success,
    /// At least one check is in a known-failed state.
    Failure,
}

impl std::fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A pull request / merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR/MR number
    pub number: u64,
    /// PR/MR title
    pub title: String,
    /// Web URL for the PR/MR
    pub html_url: String,
    /// Head (source) branch name
    pub head_ref: String,
    /// Base (target) branch name
    pub base_ref: String,
    /// When the PR/MR was opened
    pub created_at: Option<DateTime<Utc>>,
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user, organization, or GitLab group path)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com/gitlab.com)
    pub host: Option<String>,
}
