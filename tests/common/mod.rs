//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_platform;

pub use mock_platform::MockPlatformService;

use mergebot::automerge::{AutomergeType, BranchAutomergeConfig};
use mergebot::types::{Platform, PlatformConfig, PullRequest};

/// Platform config pointing at a test GitHub repo
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        platform: Platform::GitHub,
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Platform config pointing at a test GitLab project
pub fn gitlab_config() -> PlatformConfig {
    PlatformConfig {
        platform: Platform::GitLab,
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// Open PR fixture for a branch
pub fn make_pr(number: u64, branch: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("Update dependencies on {branch}"),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        head_ref: branch.to_string(),
        base_ref: base.to_string(),
        created_at: None,
    }
}

/// Engine config with branch automerge enabled
pub fn branch_automerge_config() -> BranchAutomergeConfig {
    BranchAutomergeConfig {
        automerge: true,
        automerge_type: AutomergeType::Branch,
        dry_run: false,
    }
}

/// Engine config with branch automerge enabled, in dry-run mode
pub fn dry_run_config() -> BranchAutomergeConfig {
    BranchAutomergeConfig {
        dry_run: true,
        ..branch_automerge_config()
    }
}
