//! CatGenie device identity

use serde::Serialize;
use vendor_models::models::catgenie::ThingRecord;

use crate::errors::ApiError;

/// A litter box registered to the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Vendor-assigned MAC address, used for entity unique ids
    pub mac_address: String,

    /// Manufacturer id, used as the device id on the operation endpoints
    pub manufacturer_id: String,

    pub name: Option<String>,

    pub fw_version: Option<String>,

    /// Cloud connectivity as last reported (`"connected"` when online)
    pub reported_status: Option<String>,
}

impl Device {
    pub fn is_connected(&self) -> bool {
        self.reported_status.as_deref() == Some("connected")
    }
}

impl TryFrom<ThingRecord> for Device {
    type Error = ApiError;

    fn try_from(record: ThingRecord) -> Result<Self, Self::Error> {
        let manufacturer_id = record
            .manufacturer_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::Api("Device record has no manufacturerId".to_string()))?;
        let mac_address = record
            .mac_address
            .filter(|mac| !mac.is_empty())
            .ok_or_else(|| ApiError::Api("Device record has no macAddress".to_string()))?;

        Ok(Self {
            mac_address,
            manufacturer_id,
            name: record.name,
            fw_version: record.fw_version,
            reported_status: record.reported_status,
        })
    }
}
