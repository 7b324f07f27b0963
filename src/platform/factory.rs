//! Platform service construction

use crate::auth::{get_github_auth, get_gitlab_auth};
use crate::error::Result;
use crate::platform::{GitHubService, GitLabService, PlatformService};
use crate::types::{Platform, PlatformConfig};
use tracing::debug;

/// Create a platform service for the detected platform
///
/// Resolves credentials for the platform and constructs the matching
/// service implementation.
pub async fn create_platform_service(
    config: &PlatformConfig,
    base_branch: &str,
) -> Result<Box<dyn PlatformService>> {
    debug!(platform = %config.platform, owner = %config.owner, repo = %config.repo, "creating platform service");

    match config.platform {
        Platform::GitHub => {
            let auth = get_github_auth().await?;
            let service =
                GitHubService::new(&auth.token, config.clone(), base_branch.to_string())?;
            Ok(Box::new(service))
        }
        Platform::GitLab => {
            let auth = get_gitlab_auth().await?;
            let service =
                GitLabService::new(auth.token, config.clone(), base_branch.to_string())?;
            Ok(Box::new(service))
        }
    }
}
