use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::ServerConfig;
use crate::domain::KNOWN_QUALITIES;

pub const APP_PREFIX: &str = "video-to-server";

/// Settings store location and the choices offered by the quality dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Override for the settings JSON file (default: XDG config dir).
    pub file: Option<PathBuf>,
    pub qualities: Vec<String>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            file: None,
            qualities: KNOWN_QUALITIES.iter().map(|q| q.to_string()).collect(),
        }
    }
}

/// Global configuration loaded from `~/.config/video-to-server/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub settings: SettingsConfig,
}

impl AppConfig {
    pub fn settings_file(&self) -> Result<PathBuf> {
        match &self.settings.file {
            Some(path) => Ok(path.clone()),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
                Ok(xdg_dirs.place_config_file("settings.json")?)
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AppConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let default_cfg = AppConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&data)?;
    Ok(cfg)
}
