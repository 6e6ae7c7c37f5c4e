//! CatGenie binary sensors

use entity_models::models::{BinarySensorState, DeviceInfo};

use crate::entities::{DOMAIN, MANUFACTURER, MODEL};
use crate::models::device::Device;
use crate::models::status::DeviceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarySensorClass {
    Connectivity,
    Running,
    Problem,
}

impl BinarySensorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinarySensorClass::Connectivity => "connectivity",
            BinarySensorClass::Running => "running",
            BinarySensorClass::Problem => "problem",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BinarySensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub device_class: BinarySensorClass,
}

pub const DESCRIPTIONS: [BinarySensorDescription; 3] = [
    BinarySensorDescription {
        key: DOMAIN,
        name: "Litter Box Connectivity",
        device_class: BinarySensorClass::Connectivity,
    },
    BinarySensorDescription {
        key: DOMAIN,
        name: "Litter Box Running",
        device_class: BinarySensorClass::Running,
    },
    BinarySensorDescription {
        key: DOMAIN,
        name: "Litter Box Problem",
        device_class: BinarySensorClass::Problem,
    },
];

/// One binary sensor of a litter box
#[derive(Debug, Clone)]
pub struct LitterBoxBinarySensor {
    description: BinarySensorDescription,
    unique_id: String,
}

impl LitterBoxBinarySensor {
    pub fn new(device: &Device, description: BinarySensorDescription) -> Self {
        let unique_id = format!(
            "{}_{}_{}_sensor",
            device.mac_address,
            description.key,
            description.device_class.as_str()
        );
        Self {
            description,
            unique_id,
        }
    }

    /// All sensors of a device
    pub fn for_device(device: &Device) -> Vec<Self> {
        DESCRIPTIONS
            .iter()
            .map(|description| Self::new(device, *description))
            .collect()
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device_class(&self) -> BinarySensorClass {
        self.description.device_class
    }

    /// Connectivity follows the device identity; the others need a snapshot
    /// and read off while none is available.
    pub fn is_on(&self, device: &Device, status: Option<&DeviceStatus>) -> bool {
        match self.description.device_class {
            BinarySensorClass::Connectivity => device.is_connected(),
            BinarySensorClass::Running => status.map(DeviceStatus::is_running).unwrap_or(false),
            BinarySensorClass::Problem => status.map(DeviceStatus::has_problem).unwrap_or(false),
        }
    }

    pub fn state(&self, device: &Device, status: Option<&DeviceStatus>) -> BinarySensorState {
        BinarySensorState {
            unique_id: self.unique_id.clone(),
            name: self.description.name.to_string(),
            device_class: self.description.device_class.as_str().to_string(),
            is_on: self.is_on(device, status),
        }
    }
}

/// Device registry entry for a litter box
pub fn device_info(device: &Device) -> DeviceInfo {
    DeviceInfo {
        identifiers: vec![(DOMAIN.to_string(), device.mac_address.clone())],
        name: device.name.clone(),
        manufacturer: MANUFACTURER.to_string(),
        model: MODEL.to_string(),
        model_id: Some(device.manufacturer_id.clone()),
        sw_version: device.fw_version.clone(),
    }
}
