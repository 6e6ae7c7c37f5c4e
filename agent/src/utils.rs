//! Utility functions

use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::authn::token_mngr::{TokenManager, TokenManagerExt};
use crate::filesys::file::File;
use crate::http::client::HttpClient;
use crate::http::devices::DeviceApi;
use crate::http::switchbot::SwitchBotClient;
use crate::storage::settings::{CatGenieSettings, Settings, SwitchBotSettings};
use crate::vacuum::VacuumState;

/// Version information for the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
    pub profile: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
        profile: option_env!("BUILD_PROFILE").unwrap_or("unknown").to_string(),
    }
}

/// Check the settings file and reach every configured cloud once
pub async fn run_diagnostic(settings_file: &File) {
    let version = version_info();
    println!(
        "{} {} ({})",
        "cloudlink".bold(),
        version.version,
        version.git_hash
    );

    let settings = match check_settings(settings_file).await {
        Ok(settings) => {
            report("settings", Ok(settings_file.path().display().to_string()));
            settings
        }
        Err(e) => {
            report("settings", Err(e));
            return;
        }
    };

    report("catgenie", check_catgenie(settings.catgenie).await);
    match settings.switchbot {
        Some(switchbot) => report("switchbot", check_switchbot(switchbot).await),
        None => println!("{:<10} {}", "switchbot", "not configured".dimmed()),
    }
}

fn report(name: &str, result: anyhow::Result<String>) {
    match result {
        Ok(detail) => println!("{:<10} {} {}", name, "OK".green().bold(), detail),
        Err(e) => println!("{:<10} {} {:#}", name, "FAILED".red().bold(), e),
    }
}

async fn check_settings(file: &File) -> anyhow::Result<Settings> {
    if !file.exists().await {
        bail!("{} does not exist", file.path().display());
    }
    Ok(Settings::load(file).await?)
}

async fn check_catgenie(settings: CatGenieSettings) -> anyhow::Result<String> {
    let timeout = settings.request_timeout();
    let http_client = Arc::new(HttpClient::catgenie(&settings.base_url, timeout)?);
    let token_mngr = Arc::new(TokenManager::new(
        http_client.clone(),
        settings.refresh_token,
    ));
    token_mngr
        .refresh_token()
        .await
        .context("refreshing access token")?;

    let api = DeviceApi::new(http_client, token_mngr);
    let device = api.get_first_device().await.context("listing devices")?;
    let status = api
        .get_device_status(&device.manufacturer_id)
        .await
        .context("reading operation status")?;

    Ok(format!(
        "{} ({}), state {}, error {:?}",
        device.name.as_deref().unwrap_or("unnamed"),
        device.manufacturer_id,
        status.state,
        status.error
    ))
}

async fn check_switchbot(settings: SwitchBotSettings) -> anyhow::Result<String> {
    let client = SwitchBotClient::new(
        &settings.base_url,
        settings.request_timeout(),
        settings.token,
        settings.secret,
    )?;
    let status = client
        .get_status(&settings.device_id)
        .await
        .with_context(|| format!("reading status of {}", settings.device_id))?;

    let working_status = status.working_status.unwrap_or_default();
    let state = VacuumState::from_switchbot(&working_status)
        .map(|s| s.as_str())
        .unwrap_or("unknown");
    Ok(format!(
        "{} is {} ({}), battery {}%",
        settings.device_id,
        state,
        working_status,
        status.battery.unwrap_or_default()
    ))
}
