use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::bounds::DetectionInstruction;
use crate::core::llm::providers::{DEFAULT_BASE_URL, DEFAULT_FAST_MODEL, DEFAULT_PRECISE_MODEL};
use crate::core::llm::{self, GoogleGateway, LLMError};

/// Environment variables checked, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub models: ModelConfig,
    /// Instruction pair for labeled boundary detection.
    pub labeled_instruction: DetectionInstruction,
}

/// Connection settings for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API key; empty means "read from the environment".
    pub api_key: String,
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Model identifier for each tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub fast: String,
    pub precise: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_MODEL.to_string(),
            precise: DEFAULT_PRECISE_MODEL.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/upper-bounds/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::load_from(&config_path) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(ConfigError::Read { .. }) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Configured API key, falling back to the environment.
    pub fn api_key(&self) -> Option<String> {
        let configured = self.gateway.api_key.trim();
        if !configured.is_empty() {
            return Some(configured.to_string());
        }
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    /// Gemini gateway built from this configuration.
    pub fn build_gateway(&self) -> llm::Result<GoogleGateway> {
        let api_key = self.api_key().ok_or_else(|| {
            LLMError::NotConfigured(format!(
                "google: set gateway.api_key or one of {}",
                API_KEY_ENV_VARS.join(", ")
            ))
        })?;
        Ok(GoogleGateway::new(api_key, self.gateway.timeout())?
            .with_base_url(&self.gateway.base_url)
            .with_models(&self.models.fast, &self.models.precise))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("upper-bounds").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
