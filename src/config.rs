use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::storage::{atomic_write, restrict_dir, restrict_file};

pub const APP_DIR: &str = ".passkeep";
pub const CONFIG_FILE: &str = "config.json";
pub const DATA_FILE: &str = "data.json";
pub const LOG_FILE: &str = "passkeep.log";
pub const DEFAULT_EMAIL: &str = "example@gmail.com";

/// Startup settings, read from `~/.passkeep/config.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Credential file; relative paths resolve against the config directory.
    pub data_file: PathBuf,
    /// Value the Email/Username field starts with.
    pub default_email: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE),
            default_email: DEFAULT_EMAIL.to_string(),
            log_file: PathBuf::from(LOG_FILE),
        }
    }
}

impl AppConfig {
    pub fn data_path(&self, base_dir: &Path) -> PathBuf {
        resolve(base_dir, &self.data_file)
    }

    pub fn log_path(&self, base_dir: &Path) -> PathBuf {
        resolve(base_dir, &self.log_file)
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

pub fn default_base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(APP_DIR))
}

pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_FILE)
}

pub fn load_config(base_dir: &Path) -> Result<Option<AppConfig>> {
    let path = config_path(base_dir);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg: AppConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn save_config(base_dir: &Path, cfg: &AppConfig) -> Result<()> {
    if !base_dir.exists() {
        fs::create_dir_all(base_dir)?;
        restrict_dir(base_dir)?;
    }
    let path = config_path(base_dir);
    let data = serde_json::to_string_pretty(cfg)?;
    atomic_write(&path, data.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    restrict_file(&path)?;
    Ok(())
}

/// Loads the config, writing the defaults on first run so they can be edited.
pub fn load_or_init(base_dir: &Path) -> Result<AppConfig> {
    if let Some(cfg) = load_config(base_dir)? {
        return Ok(cfg);
    }
    let cfg = AppConfig::default();
    save_config(base_dir, &cfg)?;
    Ok(cfg)
}
