//! CatGenie status source

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::coordinator::DataSource;
use crate::errors::UpdateError;
use crate::http::devices::DeviceApi;
use crate::models::device::Device;
use crate::models::status::DeviceStatus;

/// Polls the operation status of the account's first litter box
pub struct CatGenieSource {
    api: DeviceApi,
    device: RwLock<Option<Device>>,
}

impl CatGenieSource {
    pub fn new(api: DeviceApi) -> Self {
        Self {
            api,
            device: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &DeviceApi {
        &self.api
    }

    /// The device picked at setup
    pub async fn device(&self) -> Option<Device> {
        self.device.read().await.clone()
    }
}

#[async_trait]
impl DataSource for CatGenieSource {
    type Data = DeviceStatus;

    async fn setup(&self) -> Result<(), UpdateError> {
        if !self.api.token_mngr().has_token().await {
            self.api.token_mngr().refresh_token().await?;
        }

        let device = self.api.get_first_device().await?;
        info!(
            "Using litter box {} ({})",
            device.name.as_deref().unwrap_or("unnamed"),
            device.manufacturer_id
        );
        *self.device.write().await = Some(device);
        Ok(())
    }

    async fn fetch(&self) -> Result<DeviceStatus, UpdateError> {
        let device_id = self
            .device
            .read()
            .await
            .as_ref()
            .map(|device| device.manufacturer_id.clone())
            .ok_or_else(|| UpdateError::UpdateFailed("No device selected yet".to_string()))?;

        Ok(self.api.get_device_status(&device_id).await?)
    }
}
