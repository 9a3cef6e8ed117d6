//! Tool settings (TOML).
//!
//! Not to be confused with the router configuration being synchronized:
//! this file tells the tool where the tailscale binary and
//! `cli-shell-api` live. The defaults match a stock VyOS deployment, so
//! most installs never write one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Fallback location checked after the current directory.
const SYSTEM_SETTINGS_PATH: &str = "/config/tailscale/vyos-tailscale.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub client: ClientSettings,
    pub query: QuerySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Path to the tailscale control binary.
    pub binary: PathBuf,
    /// Invoke the binary through `sudo`.
    pub sudo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Path to `cli-shell-api`.
    pub shell_api: PathBuf,
    /// Configuration subtree to synchronize, one path component per entry.
    pub path: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientSettings {
                binary: PathBuf::from("/config/tailscale/tailscale"),
                sudo: true,
            },
            query: QuerySettings {
                shell_api: PathBuf::from("/usr/bin/cli-shell-api"),
                path: vec!["service".to_string(), "tailscale".to_string()],
            },
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self).expect("settings always serialize");
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolves the settings for this run.
    ///
    /// An explicitly given path must load; otherwise the current
    /// directory and the system location are tried, falling back to the
    /// built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = PathBuf::from("vyos-tailscale.toml");
        if local.exists() {
            return Self::load(&local);
        }

        let system = PathBuf::from(SYSTEM_SETTINGS_PATH);
        if system.exists() {
            return Self::load(&system);
        }

        info!("No settings file found, using defaults");
        Ok(Self::default())
    }
}
