//! Application configuration options

use std::time::Duration;

use secrecy::SecretString;

use crate::http::client::DEFAULT_TIMEOUT;
use crate::storage::settings::{CatGenieSettings, ServerSettings, Settings, SwitchBotSettings};

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// CatGenie account and polling
    pub catgenie: CatGenieOptions,

    /// SwitchBot vacuum, when one is configured
    pub switchbot: Option<SwitchBotOptions>,

    /// Enable local HTTP server
    pub enable_socket_server: bool,

    /// Server configuration
    pub server: ServerOptions,
}

impl AppOptions {
    pub fn new(catgenie: CatGenieOptions) -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            catgenie,
            switchbot: None,
            enable_socket_server: true,
            server: ServerOptions::default(),
        }
    }
}

impl From<Settings> for AppOptions {
    fn from(settings: Settings) -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            catgenie: settings.catgenie.into(),
            switchbot: settings.switchbot.map(SwitchBotOptions::from),
            enable_socket_server: settings.server.enabled,
            server: settings.server.into(),
        }
    }
}

/// CatGenie options
#[derive(Debug)]
pub struct CatGenieOptions {
    pub base_url: String,
    pub refresh_token: SecretString,
    pub update_interval: Duration,
    pub request_timeout: Duration,
}

impl CatGenieOptions {
    pub fn new(base_url: impl Into<String>, refresh_token: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_token,
            update_interval: Duration::from_secs(15),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl From<CatGenieSettings> for CatGenieOptions {
    fn from(settings: CatGenieSettings) -> Self {
        Self {
            update_interval: settings.update_interval(),
            request_timeout: settings.request_timeout(),
            base_url: settings.base_url,
            refresh_token: settings.refresh_token,
        }
    }
}

/// SwitchBot vacuum options
#[derive(Debug)]
pub struct SwitchBotOptions {
    pub base_url: String,
    pub token: SecretString,
    pub secret: SecretString,
    pub device_id: String,
    pub update_interval: Duration,
    pub request_timeout: Duration,
}

impl From<SwitchBotSettings> for SwitchBotOptions {
    fn from(settings: SwitchBotSettings) -> Self {
        Self {
            update_interval: settings.update_interval(),
            request_timeout: settings.request_timeout(),
            base_url: settings.base_url,
            token: settings.token,
            secret: settings.secret,
            device_id: settings.device_id,
        }
    }
}

/// Lifecycle options for the agent
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,

    /// Wait before setting up again after a reload failed to set up
    pub setup_retry_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
            setup_retry_delay: Duration::from_secs(60),
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl From<ServerSettings> for ServerOptions {
    fn from(settings: ServerSettings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn test_from_settings() {
        let settings: Settings = serde_json::from_value(json!({
            "catgenie": {"refresh_token": "r-token", "update_interval_secs": 30},
            "switchbot": {"token": "t", "secret": "s", "device_id": "VAC1"},
            "server": {"enabled": false, "port": 9000}
        }))
        .unwrap();

        let options = AppOptions::from(settings);

        assert_eq!(options.catgenie.refresh_token.expose_secret(), "r-token");
        assert_eq!(options.catgenie.update_interval, Duration::from_secs(30));
        assert_eq!(options.catgenie.request_timeout, Duration::from_secs(10));
        let switchbot = options.switchbot.unwrap();
        assert_eq!(switchbot.device_id, "VAC1");
        assert_eq!(switchbot.update_interval, Duration::from_secs(600));
        assert!(!options.enable_socket_server);
        assert_eq!(options.server.port, 9000);
        assert_eq!(options.server.host, "127.0.0.1");
        assert_eq!(options.lifecycle.setup_retry_delay, Duration::from_secs(60));
    }
}
