//! Configuration from `~/.worklog/config.json`.
//!
//! Every field is optional; a missing file yields the defaults.
//! `WORKLOG_API_BASE` overrides `apiBaseUrl`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filters::SourceFilterSet;
use crate::navigation::DEFAULT_LOOKBACK_MONTHS;

pub const API_BASE_ENV: &str = "WORKLOG_API_BASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// IANA timezone used to decide what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_lookback_months")]
    pub lookback_months: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Preselected sources on the entry page.
    #[serde(default)]
    pub default_sources: Option<SourceFilterSet>,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_lookback_months() -> u32 {
    DEFAULT_LOOKBACK_MONTHS
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timezone: default_timezone(),
            lookback_months: default_lookback_months(),
            request_timeout_secs: default_request_timeout_secs(),
            default_sources: None,
        }
    }
}

impl Config {
    /// Configured timezone, falling back to UTC for unknown names.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse::<chrono_tz::Tz>().unwrap_or_else(|_| {
            log::warn!("Config: unknown timezone '{}', using UTC", self.timezone);
            chrono_tz::UTC
        })
    }

    /// Wall-clock date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz()).date_naive()
    }

    fn apply_env_overrides(&mut self, api_base: Option<String>) {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            log::info!("Config: apiBaseUrl overridden by {}", API_BASE_ENV);
            self.api_base_url = base.trim().to_string();
        }
    }
}

/// `~/.worklog/config.json`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".worklog").join("config.json"))
}

/// Load the user config, applying environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = load_config_from(&config_path()?)?;
    config.apply_env_overrides(std::env::var(API_BASE_ENV).ok());
    Ok(config)
}

/// Load a config file without environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("Config: {} not found, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
