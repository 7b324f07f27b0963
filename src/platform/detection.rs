//! Platform detection from repository URLs
//!
//! Recognizes github.com and gitlab.com, plus self-hosted instances named
//! by the `GITHUB_HOST` / `GITLAB_HOST` environment variables.

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use url::Url;

const GITHUB_HOST: &str = "github.com";
const GITLAB_HOST: &str = "gitlab.com";

/// Detect which platform a repository URL belongs to
///
/// Returns `None` for hosts that are neither a known platform nor listed
/// in `GITHUB_HOST` / `GITLAB_HOST`.
#[must_use]
pub fn detect_platform(url: &str) -> Option<Platform> {
    let (host, _) = split_remote_url(url)?;
    platform_for_host(
        &host,
        std::env::var("GITHUB_HOST").ok().as_deref(),
        std::env::var("GITLAB_HOST").ok().as_deref(),
    )
}

/// Parse a repository URL into a platform configuration
///
/// Accepts HTTPS, SSH (`git@host:path`), and `ssh://` URLs. GitLab
/// subgroups are preserved in the owner part, so
/// `https://gitlab.com/a/b/repo.git` parses as owner `a/b`, repo `repo`.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let (host, path) =
        split_remote_url(url).ok_or_else(|| Error::UnsupportedRemote(url.to_string()))?;

    let platform = platform_for_host(
        &host,
        std::env::var("GITHUB_HOST").ok().as_deref(),
        std::env::var("GITLAB_HOST").ok().as_deref(),
    )
    .ok_or_else(|| Error::UnsupportedRemote(url.to_string()))?;

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let (owner, repo) = path
        .rsplit_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
        .ok_or_else(|| Error::UnsupportedRemote(url.to_string()))?;

    let default_host = match platform {
        Platform::GitHub => GITHUB_HOST,
        Platform::GitLab => GITLAB_HOST,
    };

    Ok(PlatformConfig {
        platform,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: (host != default_host).then_some(host),
    })
}

/// Split a remote URL into (host, path), supporting scp-like SSH syntax
fn split_remote_url(url: &str) -> Option<(String, String)> {
    if let Some(rest) = url.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        return Some((host.to_string(), path.to_string()));
    }

    if url.contains("://") {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        return Some((host, parsed.path().to_string()));
    }

    None
}

fn platform_for_host(
    host: &str,
    github_host: Option<&str>,
    gitlab_host: Option<&str>,
) -> Option<Platform> {
    if host == GITHUB_HOST || github_host == Some(host) {
        return Some(Platform::GitHub);
    }
    if host == GITLAB_HOST || gitlab_host == Some(host) {
        return Some(Platform::GitLab);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // Self-hosted detection is tested here with explicit host arguments
    // because mutating env vars is unsafe in Rust 2024 edition and this
    // project forbids unsafe code.

    #[test]
    fn test_github_enterprise_host() {
        let platform = platform_for_host("github.example.com", Some("github.example.com"), None);
        assert_eq!(platform, Some(Platform::GitHub));
    }

    #[test]
    fn test_self_hosted_gitlab_host() {
        let platform = platform_for_host("code.example.org", None, Some("code.example.org"));
        assert_eq!(platform, Some(Platform::GitLab));
    }

    #[test]
    fn test_unknown_host_without_overrides() {
        let platform = platform_for_host("bitbucket.org", None, None);
        assert_eq!(platform, None);
    }

    #[test]
    fn test_split_ssh_scheme_url() {
        let (host, path) = split_remote_url("ssh://git@github.com/owner/repo.git").unwrap();
        assert_eq!(host, "github.com");
        assert_eq!(path, "/owner/repo.git");
    }

    #[test]
    fn test_split_scp_like_url() {
        let (host, path) = split_remote_url("git@gitlab.com:group/repo.git").unwrap();
        assert_eq!(host, "gitlab.com");
        assert_eq!(path, "group/repo.git");
    }

    #[test]
    fn test_custom_host_recorded_in_config() {
        // parse_repo_info only keeps the host when it is not the default
        let config = parse_repo_info("https://github.com/owner/repo").unwrap();
        assert_eq!(config.host, None);
    }
}
