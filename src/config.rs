//! Run configuration loaded from `mergebot.toml`.

use crate::automerge::{AutomergeType, BranchAutomergeConfig};
use crate::emoji::EmojiConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename looked up in the working directory.
pub const CONFIG_FILE: &str = "mergebot.toml";

/// Directory name under the user config dir (e.g. `~/.config/mergebot/`).
const CONFIG_DIR: &str = "mergebot";

/// Per-run configuration for mergebot.
///
/// Everything here is resolved once at startup; the engine receives an
/// immutable snapshot derived from it via [`RunConfig::automerge_config`].
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Remote URL of the repository to operate on (HTTPS or SSH form).
    /// May instead be supplied with `--repo-url`.
    #[serde(default)]
    pub repo_url: Option<String>,
    /// Branch that update branches are merged into.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    /// Whether automerge is enabled at all. Off by default.
    #[serde(default)]
    pub automerge: bool,
    /// Which automerge mechanism to use. This worker only acts on `branch`.
    #[serde(default = "default_automerge_type")]
    pub automerge_type: AutomergeType,
    /// Simulation mode: decide, but perform no remote mutation.
    #[serde(default)]
    pub dry_run: bool,
    /// Render `:shortcode:` tokens as Unicode emoji in terminal output.
    #[serde(default = "default_unicode_emoji")]
    pub unicode_emoji: bool,
}

fn default_base_branch() -> String {
    "main".to_string()
}

const fn default_automerge_type() -> AutomergeType {
    AutomergeType::Branch
}

const fn default_unicode_emoji() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repo_url: None,
            base_branch: default_base_branch(),
            automerge: false,
            automerge_type: default_automerge_type(),
            dry_run: false,
            unicode_emoji: default_unicode_emoji(),
        }
    }
}

impl RunConfig {
    /// Snapshot the per-call engine configuration.
    ///
    /// The effective dry-run flag is the config value OR'd with the CLI
    /// flag, captured here before the pipeline starts.
    #[must_use]
    pub const fn automerge_config(&self, dry_run_flag: bool) -> BranchAutomergeConfig {
        BranchAutomergeConfig {
            automerge: self.automerge,
            automerge_type: self.automerge_type,
            dry_run: self.dry_run || dry_run_flag,
        }
    }

    /// Emoji rendering configuration for terminal output.
    #[must_use]
    pub const fn emoji(&self) -> EmojiConfig {
        EmojiConfig::new(self.unicode_emoji)
    }
}

/// Path of the per-user config file, if a user config dir exists.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join("config.toml"))
}

/// Load run configuration.
///
/// Resolution order: the explicit `--config` path (an error if missing),
/// then `mergebot.toml` in the working directory, then the per-user config
/// file. When none exists, defaults are returned and the repository must be
/// supplied on the command line.
pub fn load_config(explicit: Option<&Path>) -> Result<RunConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!("{} not found", path.display())));
        }
        return read_config(path);
    }

    let cwd_path = Path::new(CONFIG_FILE);
    if cwd_path.exists() {
        return read_config(cwd_path);
    }

    if let Some(user_path) = user_config_path()
        && user_path.exists()
    {
        return read_config(&user_path);
    }

    debug!("no config file found, using defaults");
    Ok(RunConfig::default())
}

/// Read and parse a single config file.
fn read_config(path: &Path) -> Result<RunConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: RunConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_missing_path_errors() {
        let result = load_config(Some(Path::new("/nonexistent/mergebot.toml")));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("not found")),
            other => panic!("Expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_conservative() {
        let config = RunConfig::default();
        assert!(!config.automerge);
        assert_eq!(config.automerge_type, AutomergeType::Branch);
        assert!(!config.dry_run);
        assert_eq!(config.base_branch, "main");
        assert!(config.unicode_emoji);
    }

    #[test]
    fn test_parse_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
repo_url = "https://github.com/acme/widgets"
base_branch = "develop"
automerge = true
automerge_type = "branch"
dry_run = true
unicode_emoji = false
"#,
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(
            config.repo_url.as_deref(),
            Some("https://github.com/acme/widgets")
        );
        assert_eq!(config.base_branch, "develop");
        assert!(config.automerge);
        assert_eq!(config.automerge_type, AutomergeType::Branch);
        assert!(config.dry_run);
        assert!(!config.unicode_emoji);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "automerge = true\n");

        let config = load_config(Some(&path)).unwrap();
        assert!(config.automerge);
        assert_eq!(config.base_branch, "main");
        assert!(config.repo_url.is_none());
    }

    #[test]
    fn test_unknown_automerge_type_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "automerge_type = \"merge-queue\"\n");

        let result = load_config(Some(&path));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("failed to parse")),
            other => panic!("Expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "automerge = maybe\n");

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_automerge_config_ors_dry_run_flag() {
        let config = RunConfig {
            automerge: true,
            ..RunConfig::default()
        };

        assert!(!config.automerge_config(false).dry_run);
        assert!(config.automerge_config(true).dry_run);

        let forced = RunConfig {
            dry_run: true,
            ..RunConfig::default()
        };
        assert!(forced.automerge_config(false).dry_run);
    }
}
