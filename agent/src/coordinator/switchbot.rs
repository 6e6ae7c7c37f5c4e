//! SwitchBot vacuum status source

use async_trait::async_trait;

use crate::coordinator::DataSource;
use crate::errors::UpdateError;
use crate::http::switchbot::SwitchBotClient;
use crate::models::vacuum::VacuumStatus;

/// Polls the status of one SwitchBot robot vacuum
pub struct VacuumSource {
    client: SwitchBotClient,
    device_id: String,
}

impl VacuumSource {
    pub fn new(client: SwitchBotClient, device_id: impl Into<String>) -> Self {
        Self {
            client,
            device_id: device_id.into(),
        }
    }

    pub fn client(&self) -> &SwitchBotClient {
        &self.client
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

#[async_trait]
impl DataSource for VacuumSource {
    type Data = VacuumStatus;

    async fn fetch(&self) -> Result<VacuumStatus, UpdateError> {
        let body = self.client.get_status(&self.device_id).await?;
        Ok(body.into())
    }
}
