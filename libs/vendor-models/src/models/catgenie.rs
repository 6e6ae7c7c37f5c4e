//! CatGenie cloud models (iot.petnovations.com)

use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// Refresh token request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Refresh token response
///
/// `expiration` is an epoch timestamp in milliseconds. It has been seen both
/// as a JSON number and as a numeric string, so it is kept raw here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub expiration: serde_json::Value,
}

/// Device list response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceListResponse {
    #[serde(default)]
    pub thing_list: Vec<ThingRecord>,
}

/// A single device ("thing") registered to the account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub mac_address: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub manufacturer_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub fw_version: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub reported_status: Option<String>,
}

/// Operation status response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatusResponse {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub state: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub progress: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub error: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub rtc: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sens: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub mode: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub manual: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub step_num: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub relay_mode: Option<i64>,
}

/// Operation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub state: i64,
}
