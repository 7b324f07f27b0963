//! Auth command - verify platform credentials

use crate::cli::context::resolve_platform_config;
use crate::cli::style::{Stylize, check};
use anstream::println;
use mergebot::auth::{
    AuthSource, get_github_auth, get_gitlab_auth, test_github_auth, test_gitlab_auth,
};
use mergebot::error::Result;
use mergebot::types::Platform;
use std::path::Path;

/// Run the auth command
pub async fn run_auth(config_path: Option<&Path>, repo_url: Option<&str>) -> Result<()> {
    let (_, platform_config) = resolve_platform_config(config_path, repo_url)?;
    let host = platform_config.host.as_deref();

    match platform_config.platform {
        Platform::GitHub => {
            let auth = get_github_auth().await?;
            let login = test_github_auth(&auth, host).await?;
            println!(
                "{} GitHub: authenticated as {} {}",
                check(),
                login.accent(),
                source_label(auth.source).muted()
            );
        }
        Platform::GitLab => {
            let auth = get_gitlab_auth().await?;
            let username = test_gitlab_auth(&auth, host).await?;
            println!(
                "{} GitLab: authenticated as {} {}",
                check(),
                username.accent(),
                source_label(auth.source).muted()
            );
        }
    }

    Ok(())
}

const fn source_label(source: AuthSource) -> &'static str {
    match source {
        AuthSource::Cli => "(token from CLI tool)",
        AuthSource::EnvVar => "(token from environment)",
    }
}
