//! GitLab authentication
//!
//! Resolves a token from `GITLAB_TOKEN` / `GL_TOKEN`, falling back to the
//! `glab` CLI's stored credentials.

use super::{AuthSource, token_from_cli, token_from_env};
use crate::error::{Error, Result};
use serde::Deserialize;

const ENV_VARS: [&str; 2] = ["GITLAB_TOKEN", "GL_TOKEN"];

/// Resolved GitLab credentials
#[derive(Debug, Clone)]
pub struct GitLabAuthConfig {
    /// Personal or project access token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

#[derive(Debug, Deserialize)]
struct GitLabUser {
    username: String,
}

/// Resolve a GitLab token from the environment or the `glab` CLI
pub async fn get_gitlab_auth() -> Result<GitLabAuthConfig> {
    if let Some(token) = token_from_env(&ENV_VARS) {
        return Ok(GitLabAuthConfig {
            token,
            source: AuthSource::EnvVar,
        });
    }

    if let Some(token) = token_from_cli("glab", &["config", "get", "token"]).await {
        return Ok(GitLabAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitLab token found (set GITLAB_TOKEN or run `glab auth login`)".to_string(),
    ))
}

/// Verify the token against the GitLab API, returning the username
pub async fn test_gitlab_auth(auth: &GitLabAuthConfig, host: Option<&str>) -> Result<String> {
    let host = host.unwrap_or("gitlab.com");
    let url = format!("https://{host}/api/v4/user");

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("PRIVATE-TOKEN", &auth.token)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::Auth(format!(
            "GitLab token rejected: HTTP {}",
            response.status()
        )));
    }

    let user: GitLabUser = response.json().await?;
    Ok(user.username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_names() {
        // GITLAB_TOKEN takes precedence over GL_TOKEN
        assert_eq!(ENV_VARS[0], "GITLAB_TOKEN");
    }
}
