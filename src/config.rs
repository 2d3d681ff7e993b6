//! Connection settings
//!
//! Read from `config.toml` in the config directory. Command-line flags and
//! `GROUPCTL_URL` / `GROUPCTL_TOKEN` take precedence over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::paths;

/// Settings for reaching a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Deployment URL (e.g. `https://coder.example.com`)
    pub url: Option<String>,

    /// Session token
    pub token: Option<String>,

    /// Organization for groups that don't name one; looked up when unset
    pub default_organization_id: Option<Uuid>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            default_organization_id: None,
            timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load settings from the config directory, or defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_file()?)
    }

    /// Load settings from a specific file, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings file: {}", path.display()))?;

        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in settings file: {}", path.display()))?;

        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply command-line/environment overrides
    pub fn with_overrides(mut self, url: Option<String>, token: Option<String>) -> Self {
        if url.is_some() {
            self.url = url;
        }
        if token.is_some() {
            self.token = token;
        }
        self
    }

    /// Deployment URL, or an error telling the user how to set it
    pub fn url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .context("No deployment URL configured (use --url, GROUPCTL_URL or `url` in config.toml)")
    }

    /// Session token, or an error telling the user how to set it
    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context(
                "No session token configured (use --token, GROUPCTL_TOKEN or `token` in config.toml)",
            )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
