//! Platform services for GitHub and GitLab
//!
//! Provides a unified interface for branch status, PR lookup, and branch
//! merging across platforms.

mod detection;
mod factory;
mod github;
mod gitlab;

pub use detection::{detect_platform, parse_repo_info};
pub use factory::create_platform_service;
pub use github::GitHubService;
pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{BranchStatus, PlatformConfig, PullRequest};
use async_trait::async_trait;

/// Platform service trait for branch operations
///
/// This trait abstracts GitHub and GitLab operations, allowing the same
/// automerge logic to work with either platform.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Aggregate CI status of the branch's head commit
    ///
    /// Collapses however many checks the platform reports into a single
    /// tri-state summary. A branch with no checks at all reports
    /// [`BranchStatus::Pending`].
    async fn get_branch_status(&self, branch: &str) -> Result<BranchStatus>;

    /// Find an existing open PR/MR whose head is the given branch
    async fn get_branch_pr(&self, branch: &str) -> Result<Option<PullRequest>>;

    /// Merge the branch into the configured base branch
    ///
    /// This is a branch-level merge, not a PR merge. Callers are expected
    /// to have checked for an open PR first.
    async fn merge_branch(&self, branch: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
