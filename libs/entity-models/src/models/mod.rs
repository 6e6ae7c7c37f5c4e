//! Agent API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Version response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
    pub profile: String,
}

/// Device registry entry for a physical device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(domain, identifier)` pairs
    pub identifiers: Vec<(String, String)>,
    pub name: Option<String>,
    pub manufacturer: String,
    pub model: String,
    pub model_id: Option<String>,
    pub sw_version: Option<String>,
}

/// Binary sensor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySensorState {
    pub unique_id: String,
    pub name: String,
    pub device_class: String,
    pub is_on: bool,
}

/// Status of a polling coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorStatus {
    pub name: String,
    pub last_update_success: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// CatGenie status snapshot as exposed to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LitterBoxStatusResponse {
    pub state: i64,
    pub progress: i64,
    pub error: String,
    pub rtc: Option<String>,
    pub sens: Option<String>,
    pub mode: i64,
    pub manual: i64,
    pub step_num: i64,
    pub relay_mode: Option<i64>,
    pub running: bool,
    pub problem: bool,
    pub coordinator: CoordinatorStatus,
}

/// CatGenie device response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LitterBoxDeviceResponse {
    pub mac_address: String,
    pub manufacturer_id: String,
    pub reported_status: Option<String>,
    pub device_info: DeviceInfo,
}

/// CatGenie operation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    #[serde(default = "default_operation_state")]
    pub state: i64,
}

fn default_operation_state() -> i64 {
    1
}

/// Vacuum entity state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacuumStateResponse {
    /// `None` when the vendor reported a working status with no known mapping
    pub state: Option<String>,
    pub available: bool,
    pub battery_level: Option<i64>,
    pub fan_speed: Option<String>,
    pub fan_speed_list: Vec<String>,
    pub supported_features: Vec<String>,
    pub extra_state_attributes: serde_json::Map<String, serde_json::Value>,
    pub coordinator: CoordinatorStatus,
}

/// Vacuum fan speed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanSpeedRequest {
    pub fan_speed: String,
}

/// Raw vacuum command request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacuumCommandRequest {
    pub command: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
