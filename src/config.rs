use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{GithubError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub token: Option<String>,
    pub owner: Option<String>,
    /// REST root, e.g. `https://github.example.com/api/v3` on Enterprise Server
    pub base_url: Option<String>,
    pub graphql_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| GithubError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| GithubError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "gh-team")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(GithubError::NoConfigDir)
    }

    /// Get token with env var taking precedence over config file
    pub fn token(&self) -> Result<String> {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                return Ok(token);
            }
        }

        self.token.clone().ok_or(GithubError::MissingToken)
    }

    /// Get organization, preferring explicit argument, then env, then config
    pub fn resolve_owner(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(String::from)
            .or_else(|| std::env::var("GITHUB_OWNER").ok().filter(|o| !o.is_empty()))
            .or_else(|| self.owner.clone())
            .ok_or(GithubError::NoOwner)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn graphql_url(&self) -> &str {
        self.graphql_url.as_deref().unwrap_or(DEFAULT_GRAPHQL_URL)
    }
}
