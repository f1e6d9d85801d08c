//! Application configuration stored as `config.json`.
//!
//! Lookup order for the backend URLs: built-in defaults, then the config file,
//! then the `CHATROOM_API_URL` / `CHATROOM_RAG_URL` environment variables
//! (a `.env` file in the working directory is loaded first if present).

use crate::api::DEFAULT_TIMEOUT_DURATION;
use crate::error::config::ConfigError;
use crate::{CHATROOM_APP_NAME, DEFAULT_CHAT_API_URL, DEFAULT_RETRIEVAL_URL};

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 600;

pub const CHAT_API_URL_ENV: &str = "CHATROOM_API_URL";
pub const RETRIEVAL_URL_ENV: &str = "CHATROOM_RAG_URL";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_chat_api_url")]
    pub chat_api_url: String,
    #[serde(default = "default_retrieval_url")]
    pub retrieval_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            chat_api_url: default_chat_api_url(),
            retrieval_url: default_retrieval_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Fixed metadata attached to everything sent to the retrieval backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_upload_domain")]
    pub upload_domain: String,
    #[serde(default)]
    pub upload_user_tag: String,
    #[serde(default = "default_memory_domain")]
    pub memory_domain: String,
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            upload_domain: default_upload_domain(),
            upload_user_tag: String::new(),
            memory_domain: default_memory_domain(),
            user: default_user(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

// ============================================
// DEFAULT VALUE FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_chat_api_url() -> String {
    DEFAULT_CHAT_API_URL.to_string()
}

fn default_retrieval_url() -> String {
    DEFAULT_RETRIEVAL_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_DURATION.as_secs()
}

fn default_upload_domain() -> String {
    "General".to_string()
}

fn default_memory_domain() -> String {
    "chat".to_string()
}

fn default_user() -> String {
    "user1".to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl AppConfig {
    /// Platform config directory for the chatroom (`~/.config/chatroom` on Linux).
    #[track_caller]
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CHATROOM_APP_NAME))
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Load config from {config_dir}/config.json.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: AppConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Load config, then apply `.env` and environment overrides.
    pub fn load_with_env(config_dir: &Path) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded .env from: {}", path.display());
        }

        let mut config = Self::load(config_dir)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Replace backend URLs with `CHATROOM_API_URL` / `CHATROOM_RAG_URL` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = read_env(CHAT_API_URL_ENV) {
            info!("Using {CHAT_API_URL_ENV} override: {url}");
            self.server.chat_api_url = url;
        }

        if let Some(url) = read_env(RETRIEVAL_URL_ENV) {
            info!("Using {RETRIEVAL_URL_ENV} override: {url}");
            self.server.retrieval_url = url;
        }
    }

    /// Save config to {config_dir}/config.json using atomic write.
    ///
    /// Uses temp file + rename so a crash never leaves a half-written file.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        validate_url("chat_api_url", &self.server.chat_api_url)?;
        validate_url("retrieval_url", &self.server.retrieval_url)?;

        let timeout = self.server.request_timeout_secs;
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid request timeout: {timeout}s (must be {MIN_TIMEOUT_SECS}-{MAX_TIMEOUT_SECS})"
                ),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

#[track_caller]
fn validate_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("{field} cannot be empty string"),
        });
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid URL format for {field}: {url}"),
        });
    }

    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Ok(_) => {
            debug!("{key} is set but empty, ignoring");
            None
        }
        Err(env::VarError::NotPresent) => None,
        Err(env::VarError::NotUnicode(_)) => {
            warn!("Env var {key} contains invalid unicode, ignoring");
            None
        }
    }
}
