//! SwitchBot cloud client

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use vendor_models::models::switchbot::{CommandRequest, Envelope, VacuumStatusBody};

use crate::authn::switchbot_sign::signed_headers;
use crate::errors::ApiError;
use crate::http::client::HttpClient;

/// Client for the SwitchBot v1.1 device API
pub struct SwitchBotClient {
    http_client: HttpClient,
    token: SecretString,
    secret: SecretString,
}

impl SwitchBotClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: SecretString,
        secret: SecretString,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: HttpClient::new(base_url, timeout, HeaderMap::new())?,
            token,
            secret,
        })
    }

    /// Status of a device
    pub async fn get_status(&self, device_id: &str) -> Result<VacuumStatusBody, ApiError> {
        let path = format!("/v1.1/devices/{}/status", device_id);
        self.call::<VacuumStatusBody>(Method::GET, &path, None)
            .await?
            .ok_or_else(|| ApiError::Api(format!("Empty status body for {}", device_id)))
    }

    /// Send a command to a device
    pub async fn send_command(
        &self,
        device_id: &str,
        command: &str,
        parameter: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        let path = format!("/v1.1/devices/{}/commands", device_id);
        let request = serde_json::to_value(CommandRequest::command(command, parameter))
            .map_err(|e| ApiError::Api(e.to_string()))?;
        debug!("Sending command {} to {}", command, device_id);
        self.call::<serde_json::Value>(Method::POST, &path, Some(&request))
            .await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Option<T>, ApiError> {
        let headers = signed_headers(self.token.expose_secret(), self.secret.expose_secret())?;
        let envelope: Envelope<T> = self.http_client.request(method, path, headers, body).await?;

        if !envelope.is_success() {
            error!(
                "SwitchBot {} failed: statusCode {} - {}",
                path, envelope.status_code, envelope.message
            );
            return Err(ApiError::Api(format!(
                "statusCode {}: {}",
                envelope.status_code, envelope.message
            )));
        }

        Ok(envelope.body)
    }
}
