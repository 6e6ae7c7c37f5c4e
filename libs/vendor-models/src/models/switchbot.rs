//! SwitchBot cloud models (API v1.1)

use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// `statusCode` value the SwitchBot API returns on success
pub const STATUS_SUCCESS: i64 = 100;

/// Response envelope wrapping every SwitchBot API body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status_code: i64,

    pub body: Option<T>,

    #[serde(default)]
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_SUCCESS
    }
}

/// Command request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub command_type: String,
    pub command: String,
    pub parameter: serde_json::Value,
}

impl CommandRequest {
    /// A plain device command. A missing parameter is sent as `"default"`.
    pub fn command(command: impl Into<String>, parameter: Option<serde_json::Value>) -> Self {
        Self {
            command_type: "command".to_string(),
            command: command.into(),
            parameter: parameter
                .unwrap_or_else(|| serde_json::Value::String("default".to_string())),
        }
    }
}

/// Robot vacuum status body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacuumStatusBody {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub device_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub device_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub battery: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub online_status: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub working_status: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub water_base_battery: Option<i64>,
}
