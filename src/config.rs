use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RelslashError, Result};

pub const ENV_PRODUCT_TILE_REPO: &str = "BUMP_RELEASE_PRODUCT_TILE_REPO";
pub const ENV_RELEASE_REPO: &str = "BUMP_RELEASE_RELEASE_REPO";
pub const ENV_COMMIT_AUTHOR_NAME: &str = "BUMP_RELEASE_COMMIT_AUTHOR_NAME";
pub const ENV_COMMIT_AUTHOR_EMAIL: &str = "BUMP_RELEASE_COMMIT_AUTHOR_EMAIL";

/// Absolute paths of the two repositories a run works on.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoPaths {
    pub tile_repo: PathBuf,
    pub release_repo: PathBuf,
}

/// Identity used for bump commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

fn required(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<String> {
    match lookup(var) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RelslashError::config(format!("{} variable not set", var))),
    }
}

fn absolute_path(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<PathBuf> {
    let path = PathBuf::from(required(lookup, var)?);
    if !path.is_absolute() {
        return Err(RelslashError::config(format!(
            "{} must be an absolute path",
            var
        )));
    }
    Ok(path)
}

impl RepoPaths {
    /// Reads repository paths through `lookup`, rejecting unset or relative
    /// values. The tile repository is checked first.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let tile_repo = absolute_path(&lookup, ENV_PRODUCT_TILE_REPO)?;
        let release_repo = absolute_path(&lookup, ENV_RELEASE_REPO)?;
        Ok(RepoPaths {
            tile_repo,
            release_repo,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }
}

impl CommitAuthor {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let name = required(&lookup, ENV_COMMIT_AUTHOR_NAME)?;
        let email = required(&lookup, ENV_COMMIT_AUTHOR_EMAIL)?;
        Ok(CommitAuthor { name, email })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }
}

/// Everything the bump command needs from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpEnv {
    pub repos: RepoPaths,
    pub author: CommitAuthor,
}

impl BumpEnv {
    /// Repository paths are validated before the author.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let repos = RepoPaths::from_lookup(&lookup)?;
        let author = CommitAuthor::from_lookup(&lookup)?;
        Ok(BumpEnv { repos, author })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }
}

fn default_remote_source() -> String {
    "final-pcf-bosh-releases".to_string()
}

fn default_commit_message() -> String {
    "bump {release} to version {version}".to_string()
}

/// Optional tuning loaded from `relslash.toml`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Remote source written into bumped lock entries
    #[serde(default = "default_remote_source")]
    pub remote_source: String,

    /// Commit message template; `{release}` and `{version}` are substituted
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            remote_source: default_remote_source(),
            commit_message: default_commit_message(),
        }
    }
}

impl Settings {
    pub fn commit_message_for(&self, release: &str, version: &str) -> String {
        self.commit_message
            .replace("{release}", release)
            .replace("{version}", version)
    }
}

/// Loads settings from file or returns defaults.
///
/// Attempts to load settings in the following order:
/// 1. Custom path provided as parameter
/// 2. `relslash.toml` in current directory
/// 3. `.relslash.toml` in the user config directory
/// 4. Default settings if no file found
pub fn load_settings(config_path: Option<&str>) -> Result<Settings> {
    let settings_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./relslash.toml").exists() {
        fs::read_to_string("./relslash.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".relslash.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Settings::default());
        }
    } else {
        return Ok(Settings::default());
    };

    toml::from_str(&settings_str)
        .map_err(|e| RelslashError::config(format!("invalid settings file: {}", e)))
}
