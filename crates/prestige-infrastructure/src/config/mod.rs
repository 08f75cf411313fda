mod timeouts;

pub use timeouts::TimeoutConfig;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub use crate::http::RetryConfig;

const APP_DIR: &str = "prestige";
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "PRESTIGE_API_URL";
pub const ENV_LOG_DIR: &str = "PRESTIGE_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "PRESTIGE_LOG_LEVEL";

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => anyhow::bail!("Unknown log level '{}'", other),
        }
    }
}

/// Remote service endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the REST API; endpoint paths are joined onto it
    pub base_url: String,

    /// Public signup page used to build referral links
    pub signup_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.prestige.example/v1/".to_string(),
            signup_url: "https://prestige.example/signup".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub timeouts: TimeoutConfig,
    /// Length of the daily reward cycle shown in the calendar
    pub reward_cycle_days: u32,
    pub leaderboard_limit: u32,
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
            reward_cycle_days: 7,
            leaderboard_limit: 25,
            log_level: LogLevel::Info,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from `path` (or the per-user default location), then apply
    /// environment overrides. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);

        let mut config = match path {
            Some(ref path) if path.exists() => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                let config: AppConfig = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?;
                info!("[config] loaded {}", path.display());
                config
            }
            _ => {
                debug!("[config] no config file found, using defaults");
                AppConfig::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PRESTIGE_*` overrides from the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }

        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.trim().is_empty()) {
            self.log_dir = Some(PathBuf::from(dir));
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level
                .parse()
                .with_context(|| format!("Invalid {}", ENV_LOG_LEVEL))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL '{}'", self.api.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must be http or https, got '{}'", base.scheme());
        }

        Url::parse(&self.api.signup_url)
            .with_context(|| format!("Invalid signup URL '{}'", self.api.signup_url))?;

        if self.reward_cycle_days == 0 {
            anyhow::bail!("reward_cycle_days must be at least 1");
        }

        Ok(())
    }

    /// Configured log directory, or the per-user data directory
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("logs")
}
