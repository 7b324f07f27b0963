//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by the automerge and auth commands.

use mergebot::config::{RunConfig, load_config};
use mergebot::error::{Error, Result};
use mergebot::platform::{PlatformService, create_platform_service, parse_repo_info};
use mergebot::types::PlatformConfig;
use std::path::Path;

/// Shared context for CLI commands that interact with the platform
///
/// Encapsulates the common setup: loading configuration, resolving the
/// repository URL, detecting the platform, and creating an authenticated
/// service. Commands that need the parsed repository coordinates without a
/// service use [`resolve_platform_config`] directly.
pub struct CommandContext {
    /// Loaded run configuration
    pub config: RunConfig,
    /// Platform service (GitHub/GitLab)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context
    pub async fn new(config_path: Option<&Path>, repo_url: Option<&str>) -> Result<Self> {
        let (config, platform_config) = resolve_platform_config(config_path, repo_url)?;

        let platform = create_platform_service(&platform_config, &config.base_branch).await?;

        Ok(Self { config, platform })
    }
}

/// Load configuration and parse the effective repository URL
///
/// The `--repo-url` flag wins over the config file. Fails when neither
/// names a repository.
pub fn resolve_platform_config(
    config_path: Option<&Path>,
    repo_url: Option<&str>,
) -> Result<(RunConfig, PlatformConfig)> {
    let mut config = load_config(config_path)?;
    if let Some(url) = repo_url {
        config.repo_url = Some(url.to_string());
    }

    let url = config.repo_url.as_deref().ok_or_else(|| {
        Error::Config(
            "no repository configured (set repo_url in mergebot.toml or pass --repo-url)"
                .to_string(),
        )
    })?;

    let platform_config = parse_repo_info(url)?;
    Ok((config, platform_config))
}
