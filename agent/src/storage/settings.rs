//! Settings file management

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::errors::AgentError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Agent settings
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log output configuration
    #[serde(default)]
    pub logging: LoggingSettings,

    /// CatGenie cloud account
    pub catgenie: CatGenieSettings,

    /// SwitchBot cloud account and vacuum, if one is configured
    #[serde(default)]
    pub switchbot: Option<SwitchBotSettings>,

    /// Local host API
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// Read and validate the settings file
    pub async fn load(file: &File) -> Result<Self, AgentError> {
        let settings: Settings = file.read_json().await.map_err(|e| {
            AgentError::ConfigError(format!(
                "Unable to read settings file {}: {}",
                file.path().display(),
                e
            ))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        if self.catgenie.refresh_token.expose_secret().trim().is_empty() {
            return Err(AgentError::ConfigError(
                "catgenie.refresh_token is empty".to_string(),
            ));
        }
        if self.catgenie.update_interval_secs == 0 {
            return Err(AgentError::ConfigError(
                "catgenie.update_interval_secs must be positive".to_string(),
            ));
        }
        if let Some(switchbot) = &self.switchbot {
            if switchbot.device_id.trim().is_empty() {
                return Err(AgentError::ConfigError(
                    "switchbot.device_id is empty".to_string(),
                ));
            }
            if switchbot.token.expose_secret().is_empty()
                || switchbot.secret.expose_secret().is_empty()
            {
                return Err(AgentError::ConfigError(
                    "switchbot.token and switchbot.secret are required".to_string(),
                ));
            }
            if switchbot.update_interval_secs == 0 {
                return Err(AgentError::ConfigError(
                    "switchbot.update_interval_secs must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// Log output settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,

    /// Write daily rolling log files into this directory
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// CatGenie account settings
#[derive(Debug, Deserialize)]
pub struct CatGenieSettings {
    /// Long-lived refresh token from the mobile app
    pub refresh_token: SecretString,

    #[serde(default = "default_catgenie_url")]
    pub base_url: String,

    #[serde(default = "default_catgenie_interval")]
    pub update_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl CatGenieSettings {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_catgenie_url() -> String {
    "https://iot.petnovations.com".to_string()
}

fn default_catgenie_interval() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    10
}

/// SwitchBot account settings
#[derive(Debug, Deserialize)]
pub struct SwitchBotSettings {
    /// Open token from the SwitchBot app
    pub token: SecretString,

    /// Secret key from the SwitchBot app
    pub secret: SecretString,

    /// Vacuum device id
    pub device_id: String,

    #[serde(default = "default_switchbot_url")]
    pub base_url: String,

    #[serde(default = "default_switchbot_interval")]
    pub update_interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl SwitchBotSettings {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_switchbot_url() -> String {
    "https://api.switch-bot.com".to_string()
}

fn default_switchbot_interval() -> u64 {
    600
}

/// Local host API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}
