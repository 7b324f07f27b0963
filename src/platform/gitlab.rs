//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{BranchStatus, PlatformConfig, PullRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    config: PlatformConfig,
    /// Branch that update branches are merged into
    base_branch: String,
    project_path: String,
    /// API base URL including `/api/v4`, without trailing slash
    api_base: String,
}

#[derive(Deserialize)]
struct MergeRequest {
    iid: u64,
    web_url: String,
    source_branch: String,
    target_branch: String,
    title: String,
    created_at: Option<DateTime<Utc>>,
}

/// Pipeline status
#[derive(Deserialize)]
struct Pipeline {
    status: String, // "success", "failed", "running", "pending", ...
}

/// Merge accept response
#[derive(Deserialize)]
struct MergeResponse {
    state: String,
    merge_commit_sha: Option<String>,
}

impl From<MergeRequest> for PullRequest {
    fn from(mr: MergeRequest) -> Self {
        Self {
            number: mr.iid,
            title: mr.title,
            html_url: mr.web_url,
            head_ref: mr.source_branch,
            base_ref: mr.target_branch,
            created_at: mr.created_at,
        }
    }
}

#[derive(Serialize)]
struct CreateMrPayload {
    source_branch: String,
    target_branch: String,
    title: String,
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl GitLabService {
    /// Create a new GitLab service
    pub fn new(token: String, config: PlatformConfig, base_branch: String) -> Result<Self> {
        let host = config.host.as_deref().unwrap_or("gitlab.com");
        let api_base = format!("https://{host}/api/v4");
        Self::build(token, config, base_branch, api_base)
    }

    /// Create a service pointed at an alternate API base URL.
    ///
    /// Used by tests to target a local mock server.
    pub fn with_base_url(
        token: String,
        config: PlatformConfig,
        base_branch: String,
        base_url: &str,
    ) -> Result<Self> {
        Self::build(
            token,
            config,
            base_branch,
            base_url.trim_end_matches('/').to_string(),
        )
    }

    fn build(
        token: String,
        config: PlatformConfig,
        base_branch: String,
        api_base: String,
    ) -> Result<Self> {
        let project_path = format!("{}/{}", config.owner, config.repo);

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            config,
            base_branch,
            project_path,
            api_base,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    fn encoded_project(&self) -> String {
        urlencoding::encode(&self.project_path).into_owned()
    }

    /// Open a merge request for the branch against the base branch
    ///
    /// Used by [`merge_branch`] since GitLab has no branch-level merge
    /// endpoint; the MR is merged immediately afterwards.
    ///
    /// [`merge_branch`]: PlatformService::merge_branch
    async fn create_merge_request(&self, branch: &str) -> Result<MergeRequest> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let payload = CreateMrPayload {
            source_branch: branch.to_string(),
            target_branch: self.base_branch.clone(),
            title: format!("Merge branch {branch}"),
        };

        let mr: MergeRequest = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(mr_iid = mr.iid, branch, "created merge request");
        Ok(mr)
    }

    async fn accept_merge_request(&self, mr_iid: u64) -> Result<Option<String>> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}/merge",
            self.encoded_project(),
            mr_iid
        ));

        let response: MergeResponse = self
            .client
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(format!("Merge failed: {e}")))?
            .json()
            .await?;

        if response.state != "merged" {
            return Err(Error::GitLabApi(format!(
                "merge request not merged, state is {}",
                response.state
            )));
        }
        Ok(response.merge_commit_sha)
    }

    async fn close_merge_request(&self, mr_iid: u64) -> Result<()> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}",
            self.encoded_project(),
            mr_iid
        ));

        self.client
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "state_event": "close" }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        debug!(mr_iid, "closed merge request");
        Ok(())
    }
}

#[async_trait]
impl PlatformService for GitLabService {
    async fn get_branch_status(&self, branch: &str) -> Result<BranchStatus> {
        debug!(branch, "checking branch status");
        let url = self.api_url(&format!("/projects/{}/pipelines", self.encoded_project()));

        let pipelines: Vec<Pipeline> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[
                ("ref", branch),
                ("order_by", "id"),
                ("sort", "desc"),
                ("per_page", "1"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        // Latest pipeline for the ref decides; no pipeline means the
        // branch has no CI signal yet
        let status = match pipelines.first().map(|p| p.status.as_str()) {
            Some("success") => BranchStatus::Success,
            Some("failed" | "canceled") => BranchStatus::Failure,
            Some(_) | None => BranchStatus::Pending,
        };

        debug!(branch, %status, "pipeline status");
        Ok(status)
    }

    async fn get_branch_pr(&self, branch: &str) -> Result<Option<PullRequest>> {
        debug!(branch, "finding existing MR");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let mrs: Vec<MergeRequest> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("source_branch", branch), ("state", "opened")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        let result: Option<PullRequest> = mrs.into_iter().next().map(Into::into);
        if let Some(ref pr) = result {
            debug!(mr_iid = pr.number, "found existing MR");
        } else {
            debug!("no existing MR found");
        }
        Ok(result)
    }

    async fn merge_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, base = %self.base_branch, "merging branch via merge request");

        // GitLab has no branch-level merge endpoint, so open an MR and
        // accept it in one go
        let mr = self.create_merge_request(branch).await?;

        match self.accept_merge_request(mr.iid).await {
            Ok(sha) => {
                debug!(branch, mr_iid = mr.iid, sha = ?sha, "merged branch");
                Ok(())
            }
            Err(err) => {
                // An MR left open here would make every later run abort
                // on the existing-MR check
                if let Err(close_err) = self.close_merge_request(mr.iid).await {
                    warn!(mr_iid = mr.iid, %close_err, "failed to close merge request");
                }
                Err(err)
            }
        }
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
