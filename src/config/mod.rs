//! Configuration management for scenario-dash.
//!
//! Handles:
//! - Dashboard service location and request timeouts
//! - Chat input limits
//! - Display preferences (theme, hint bubble, ASCII mode)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dashboard service settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Assistant panel settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Display options.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Project-specific configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = ".scendash.toml";

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration with project-specific overrides.
    ///
    /// Searches for `.scendash.toml` in the given directory and merges it
    /// over the global configuration.
    pub fn load_for_project(project_dir: &Path) -> Result<Self> {
        let mut config = Self::load().unwrap_or_default();

        let project_config_path = project_dir.join(PROJECT_CONFIG_FILENAME);
        if project_config_path.exists() {
            let project_config = Self::load_from(&project_config_path)?;
            config.merge_from(&project_config);
        }

        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DashError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| DashError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Merge another config into this one (other takes precedence where it
    /// differs from the defaults).
    pub fn merge_from(&mut self, other: &Config) {
        let defaults = ServerConfig::default();
        if other.server.base_url != defaults.base_url {
            self.server.base_url = other.server.base_url.clone();
        }
        if other.server.connect_timeout_secs != defaults.connect_timeout_secs {
            self.server.connect_timeout_secs = other.server.connect_timeout_secs;
        }
        if other.server.data_timeout_secs != defaults.data_timeout_secs {
            self.server.data_timeout_secs = other.server.data_timeout_secs;
        }
        if other.server.map_timeout_secs != defaults.map_timeout_secs {
            self.server.map_timeout_secs = other.server.map_timeout_secs;
        }
        if other.server.chat_timeout_secs != defaults.chat_timeout_secs {
            self.server.chat_timeout_secs = other.server.chat_timeout_secs;
        }

        if other.chat.max_input_len != ChatConfig::default().max_input_len {
            self.chat.max_input_len = other.chat.max_input_len;
        }

        if other.display.theme != "dark" {
            self.display.theme = other.display.theme.clone();
        }
        if let Some(show_hint) = other.display.show_hint {
            self.display.show_hint = Some(show_hint);
        }
        if let Some(ascii) = other.display.ascii {
            self.display.ascii = Some(ascii);
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DashError::config(format!("Failed to serialize config: {e}")))?;
        atomic_write(path, content.as_bytes())
    }

    /// Validate values that cannot be expressed in the types.
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(DashError::config("server.base_url must not be empty"));
        }
        if self.server.chat_timeout_secs == 0 || self.server.data_timeout_secs == 0 {
            return Err(DashError::config("request timeouts must be at least one second"));
        }
        if self.chat.max_input_len == 0 {
            return Err(DashError::config("chat.max_input_len must be positive"));
        }
        Ok(())
    }
}

/// Dashboard service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the service (without `/api`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// TCP connect timeout.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Timeout for `/api/data`.
    #[serde(default = "default_data_timeout")]
    pub data_timeout_secs: u64,
    /// Timeout for `/api/map`.
    #[serde(default = "default_map_timeout")]
    pub map_timeout_secs: u64,
    /// Timeout for `/api/chat`.
    #[serde(default = "default_chat_timeout")]
    pub chat_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            data_timeout_secs: default_data_timeout(),
            map_timeout_secs: default_map_timeout(),
            chat_timeout_secs: default_chat_timeout(),
        }
    }
}

/// Assistant panel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum characters accepted in the input line.
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_input_len: default_max_input_len(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Theme name (`dark` or `light`).
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Show the assistant hint bubble on startup. Unset means yes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_hint: Option<bool>,
    /// Use ASCII instead of Unicode symbols. Unset means no.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascii: Option<bool>,
}

impl DisplayConfig {
    /// Whether the hint bubble starts visible.
    #[must_use]
    pub fn show_hint(&self) -> bool {
        self.show_hint.unwrap_or(true)
    }

    /// Whether to draw with ASCII symbols only.
    #[must_use]
    pub fn ascii(&self) -> bool {
        self.ascii.unwrap_or(false)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            show_hint: None,
            ascii: None,
        }
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_data_timeout() -> u64 {
    60
}

fn default_map_timeout() -> u64 {
    120
}

fn default_chat_timeout() -> u64 {
    60
}

fn default_max_input_len() -> usize {
    2000
}

fn default_theme() -> String {
    "dark".to_string()
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| DashError::config("could not determine the user configuration directory"))?;

    Ok(config_dir.join("scenario-dash").join("config.toml"))
}
