//! Client settings for the headless runner.
//!
//! The backend address is resolved in priority order:
//! 1. Command-line argument
//! 2. `ZENIN_API_URL` environment variable
//! 3. `api_url` in the TOML settings file
//! 4. The development default

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{ApiBase, DEV_API_URL};
use crate::data_source::{DEFAULT_EXTENSION, DEFAULT_PREVIEW_LIMIT};
use crate::error::ClientError;

pub const API_URL_ENV: &str = "ZENIN_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub api_url: Option<String>,
    /// Recording extension kept when a folder is selected.
    pub extension: String,
    pub preview_limit: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            extension: DEFAULT_EXTENSION.to_string(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl ClientSettings {
    /// `<config dir>/zenin/client.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("zenin").join("client.toml"))
    }

    /// Read settings from `path`, or from the default location when `None`.
    /// A missing file yields the defaults; an unreadable one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    debug!("No config directory on this platform, using default settings");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!("Settings file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let settings = Self::from_toml(&content)
            .map_err(|e| ClientError::Settings(format!("{}: {}", path.display(), e)))?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Pick the backend address from the command line, the environment
    /// value, these settings, then the development default.
    pub fn api_url(&self, cli_arg: Option<&str>, env_value: Option<&str>) -> String {
        cli_arg
            .or(env_value)
            .or(self.api_url.as_deref())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEV_API_URL)
            .to_string()
    }

    /// [`api_url`](Self::api_url) with the live `ZENIN_API_URL`, parsed.
    pub fn api_base(&self, cli_arg: Option<&str>) -> Result<ApiBase, ClientError> {
        let env_value = std::env::var(API_URL_ENV).ok();
        ApiBase::parse(&self.api_url(cli_arg, env_value.as_deref()))
    }
}
