//! GitHub authentication
//!
//! Resolves a token from `GITHUB_TOKEN` / `GH_TOKEN`, falling back to the
//! `gh` CLI's stored credentials.

use super::{AuthSource, token_from_cli, token_from_env};
use crate::error::{Error, Result};

const ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Personal access token or installation token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Resolve a GitHub token from the environment or the `gh` CLI
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    if let Some(token) = token_from_env(&ENV_VARS) {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
        });
    }

    if let Some(token) = token_from_cli("gh", &["auth", "token"]).await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found (set GITHUB_TOKEN or run `gh auth login`)".to_string(),
    ))
}

/// Verify the token against the GitHub API, returning the login name
pub async fn test_github_auth(auth: &GitHubAuthConfig, host: Option<&str>) -> Result<String> {
    let mut builder = octocrab::Octocrab::builder().personal_token(auth.token.clone());
    if let Some(host) = host {
        builder = builder.base_uri(format!("https://{host}/api/v3"))?;
    }
    let octocrab = builder.build()?;

    let user = octocrab.current().user().await?;
    Ok(user.login)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_names() {
        // GITHUB_TOKEN takes precedence over GH_TOKEN
        assert_eq!(ENV_VARS[0], "GITHUB_TOKEN");
    }

    #[tokio::test]
    async fn test_missing_cli_tool_yields_none() {
        let token = token_from_cli("definitely-not-a-real-binary-xyz", &["auth", "token"]).await;
        assert_eq!(token, None);
    }
}
