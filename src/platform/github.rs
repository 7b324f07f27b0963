//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{BranchStatus, PlatformConfig, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct CombinedStatus {
    state: String,
    total_count: u32,
}

#[derive(Deserialize)]
struct CheckRunsResponse {
    total_count: u32,
    check_runs: Vec<CheckRun>,
}

#[derive(Deserialize)]
struct CheckRun {
    status: String,
    conclusion: Option<String>,
}

#[derive(Deserialize)]
struct MergeResponse {
    sha: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Branch that update branches are merged into
    base_branch: String,
    /// Token for raw HTTP requests (endpoints octocrab does not cover)
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, config: PlatformConfig, base_branch: String) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_base = if let Some(host) = config.host.as_deref() {
            let base_url = format!("https://{host}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            base_url
        } else {
            "https://api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config,
            base_branch,
            token: token.to_string(),
            http_client: http_client()?,
            api_base,
        })
    }

    /// Create a service pointed at an alternate API base URL.
    ///
    /// Used by tests to target a local mock server.
    pub fn with_base_url(
        token: &str,
        config: PlatformConfig,
        base_branch: String,
        base_url: &str,
    ) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_url)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config,
            base_branch,
            token: token.to_string(),
            http_client: http_client()?,
            api_base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Summarize legacy commit statuses for the branch head
    ///
    /// GitHub has two CI systems:
    /// 1. Commit Status API (legacy) - used by external CI services
    /// 2. Check Runs API (modern) - used by GitHub Actions
    ///
    /// This covers the first; returns `None` when no statuses are
    /// configured so the caller can fall through to check runs.
    async fn commit_status_signal(&self, branch: &str) -> Result<Option<BranchStatus>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/status",
            self.api_base, self.config.owner, self.config.repo, branch
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch commit status: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(branch, "commit status endpoint returned 404, no statuses");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Commit status check failed: HTTP {}",
                response.status()
            )));
        }

        let status: CombinedStatus = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse commit status: {e}")))?;

        if status.total_count == 0 {
            debug!(branch, "no commit statuses configured");
            return Ok(None);
        }

        debug!(branch, state = %status.state, count = status.total_count, "commit status result");
        Ok(Some(match status.state.as_str() {
            "success" => BranchStatus::Success,
            "pending" => BranchStatus::Pending,
            _ => BranchStatus::Failure,
        }))
    }

    /// Summarize GitHub Actions check runs for the branch head
    ///
    /// Returns `None` when no check runs are configured. Any non-completed
    /// run means pending; any conclusion outside success/neutral/skipped
    /// means failure.
    async fn check_runs_signal(&self, branch: &str) -> Result<Option<BranchStatus>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/check-runs",
            self.api_base, self.config.owner, self.config.repo, branch
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch check runs: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(branch, "check runs endpoint returned 404, no checks");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Check runs lookup failed: HTTP {}",
                response.status()
            )));
        }

        let check_runs: CheckRunsResponse = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse check runs: {e}")))?;

        if check_runs.total_count == 0 {
            debug!(branch, "no check runs configured");
            return Ok(None);
        }

        for run in &check_runs.check_runs {
            if run.status != "completed" {
                debug!(branch, status = %run.status, "check run still in progress");
                return Ok(Some(BranchStatus::Pending));
            }

            match run.conclusion.as_deref() {
                Some("success" | "neutral" | "skipped") => {}
                Some(conclusion) => {
                    debug!(branch, conclusion = %conclusion, "check run failed");
                    return Ok(Some(BranchStatus::Failure));
                }
                None => {
                    // Completed but no conclusion? Treat as failure
                    debug!(branch, "check run completed but no conclusion");
                    return Ok(Some(BranchStatus::Failure));
                }
            }
        }

        debug!(branch, count = check_runs.total_count, "all check runs passed");
        Ok(Some(BranchStatus::Success))
    }
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent("mergebot")
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))
}

/// Combine the two CI signals into one branch status
///
/// Failure anywhere wins, then pending, then success. A branch with no
/// checks from either API reports pending so it is never automerged on
/// an empty signal.
fn combine_signals(statuses: Option<BranchStatus>, checks: Option<BranchStatus>) -> BranchStatus {
    use BranchStatus::{Failure, Pending, Success};
    match (statuses, checks) {
        (Some(Failure), _) | (_, Some(Failure)) => Failure,
        (Some(Pending), _) | (_, Some(Pending)) => Pending,
        (Some(Success), _) | (_, Some(Success)) => Success,
        (None, None) => Pending,
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
        created_at: pr.created_at,
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_branch_status(&self, branch: &str) -> Result<BranchStatus> {
        debug!(branch, "checking branch status");

        let statuses = self.commit_status_signal(branch).await?;
        let checks = self.check_runs_signal(branch).await?;

        let status = combine_signals(statuses, checks);
        debug!(branch, %status, "combined branch status");
        Ok(status)
    }

    async fn get_branch_pr(&self, branch: &str) -> Result<Option<PullRequest>> {
        debug!(branch, "finding existing PR");
        let head = format!("{}:{}", &self.config.owner, branch);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        let result = prs.items.first().map(pr_from_octocrab);
        if let Some(ref pr) = result {
            debug!(pr_number = pr.number, "found existing PR");
        } else {
            debug!("no existing PR found");
        }
        Ok(result)
    }

    async fn merge_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, base = %self.base_branch, "merging branch");

        let url = format!(
            "{}/repos/{}/{}/merges",
            self.api_base, self.config.owner, self.config.repo
        );

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&serde_json::json!({
                "base": self.base_branch,
                "head": branch,
            }))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge request failed: {e}")))?;

        match response.status() {
            reqwest::StatusCode::CREATED => {
                let merge: MergeResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::GitHubApi(format!("Failed to parse merge result: {e}")))?;
                debug!(branch, sha = %merge.sha, "merged branch");
                Ok(())
            }
            // 204: base already contains the head commit
            reqwest::StatusCode::NO_CONTENT => {
                debug!(branch, "branch already merged");
                Ok(())
            }
            reqwest::StatusCode::CONFLICT => Err(Error::GitHubApi(format!(
                "Merge conflict between {branch} and {}",
                self.base_branch
            ))),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::GitHubApi(format!("Merge failed: HTTP {status}: {body}")))
            }
        }
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
