//! CatGenie device API client

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use vendor_models::models::catgenie::{
    DeviceListResponse, OperationRequest, OperationStatusResponse,
};

use crate::authn::token_mngr::TokenManagerExt;
use crate::errors::ApiError;
use crate::http::client::HttpClient;
use crate::models::device::Device;
use crate::models::status::DeviceStatus;

/// Operation state that starts a cleaning cycle
pub const DEFAULT_OPERATION_STATE: i64 = 1;

/// Authenticated access to the device endpoints
pub struct DeviceApi {
    http_client: Arc<HttpClient>,
    token_mngr: Arc<dyn TokenManagerExt>,
}

impl DeviceApi {
    pub fn new(http_client: Arc<HttpClient>, token_mngr: Arc<dyn TokenManagerExt>) -> Self {
        Self {
            http_client,
            token_mngr,
        }
    }

    pub fn token_mngr(&self) -> &Arc<dyn TokenManagerExt> {
        &self.token_mngr
    }

    /// List the devices registered to the account
    pub async fn get_devices(&self) -> Result<Vec<Device>, ApiError> {
        let response: DeviceListResponse = self
            .call(Method::GET, "/device/device", None)
            .await?;
        response
            .thing_list
            .into_iter()
            .map(Device::try_from)
            .collect()
    }

    /// The first device of the account
    pub async fn get_first_device(&self) -> Result<Device, ApiError> {
        self.get_devices()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Api("No devices registered to this account".to_string()))
    }

    /// Current operation status of a device
    pub async fn get_device_status(&self, device_id: &str) -> Result<DeviceStatus, ApiError> {
        let path = format!("/device/management/{}/operation/status", device_id);
        let response: OperationStatusResponse = self.call(Method::GET, &path, None).await?;
        Ok(response.into())
    }

    /// Ask the device to switch operation state
    pub async fn send_operation(
        &self,
        device_id: &str,
        state: i64,
    ) -> Result<serde_json::Value, ApiError> {
        let path = format!("/device/management/{}/operation", device_id);
        let body = serde_json::to_value(OperationRequest { state })
            .map_err(|e| ApiError::Api(e.to_string()))?;
        self.call(Method::POST, &path, Some(&body)).await
    }

    /// Perform an authenticated call
    ///
    /// A rejected call forces one token refresh and is retried once. A second
    /// rejection is returned as is.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let token = self.token_mngr.get_token().await?;

        match self
            .http_client
            .request(method.clone(), path, token.bearer_headers(), body)
            .await
        {
            Err(ApiError::Authentication(msg)) => {
                warn!("{} {} rejected ({}), refreshing token and retrying", method, path, msg);
                let token = self.token_mngr.refresh_token().await?;
                let result = self
                    .http_client
                    .request(method, path, token.bearer_headers(), body)
                    .await;
                if result.as_ref().err().is_some_and(ApiError::is_auth) {
                    debug!("Retry rejected as well, giving up");
                }
                result
            }
            result => result,
        }
    }
}
