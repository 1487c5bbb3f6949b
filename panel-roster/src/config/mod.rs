//! Application configuration
//!
//! Resolution order, later wins: built-in defaults, the TOML config file,
//! `PANEL_ROSTER_*` environment variables (a `.env` file is loaded first),
//! then command-line flags.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::store::TableFiles;

pub const ENV_BIND: &str = "PANEL_ROSTER_BIND";
pub const ENV_DATA_DIR: &str = "PANEL_ROSTER_DATA_DIR";
pub const ENV_MAX_UPLOAD_BYTES: &str = "PANEL_ROSTER_MAX_UPLOAD_BYTES";
pub const ENV_SESSION_TTL_MINUTES: &str = "PANEL_ROSTER_SESSION_TTL_MINUTES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: SocketAddr,
    pub data_dir: PathBuf,
    pub files: TableFiles,
    pub session_cookie: String,
    /// Minutes a login stays valid
    pub session_ttl_minutes: u32,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            data_dir: PathBuf::from("."),
            files: TableFiles::default(),
            session_cookie: "panel_session".to_string(),
            session_ttl_minutes: 8 * 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn session_ttl(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.session_ttl_minutes))
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("panel-roster").join("config.toml"))
    }

    /// Load configuration from `path`, or the default location when none is
    /// given. A missing default file is not an error; a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind
                .trim()
                .parse()
                .with_context(|| format!("{ENV_BIND} is not a socket address: {bind}"))?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(max) = lookup(ENV_MAX_UPLOAD_BYTES) {
            self.max_upload_bytes = max
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_UPLOAD_BYTES} is not a byte count: {max}"))?;
        }
        if let Some(ttl) = lookup(ENV_SESSION_TTL_MINUTES) {
            self.session_ttl_minutes = ttl
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SESSION_TTL_MINUTES} is not a minute count: {ttl}"))?;
        }
        Ok(())
    }
}
