//! CatGenie status snapshot

use serde::Serialize;
use vendor_models::models::catgenie::OperationStatusResponse;

/// Point-in-time status of a litter box
///
/// Built once per poll and never mutated; the next poll replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub state: i64,
    pub progress: i64,
    /// Empty when the device reports no error
    pub error: String,
    pub rtc: Option<String>,
    pub sens: Option<String>,
    pub mode: i64,
    pub manual: i64,
    pub step_num: i64,
    pub relay_mode: Option<i64>,
}

impl DeviceStatus {
    /// A cleaning cycle is in progress
    pub fn is_running(&self) -> bool {
        self.state > 0
    }

    /// The device reports an error, whatever its state
    pub fn has_problem(&self) -> bool {
        !self.error.is_empty()
    }
}

impl From<OperationStatusResponse> for DeviceStatus {
    fn from(response: OperationStatusResponse) -> Self {
        Self {
            state: response.state.unwrap_or(0),
            progress: response.progress.unwrap_or(0),
            error: response.error.unwrap_or_default(),
            rtc: response.rtc,
            sens: response.sens,
            mode: response.mode.unwrap_or(0),
            manual: response.manual.unwrap_or(0),
            step_num: response.step_num.unwrap_or(0),
            relay_mode: response.relay_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(value: serde_json::Value) -> DeviceStatus {
        let response: OperationStatusResponse = serde_json::from_value(value).unwrap();
        response.into()
    }

    #[test]
    fn test_running_without_problem() {
        let status = status(json!({"state": 2, "progress": 50, "error": ""}));
        assert_eq!(status.state, 2);
        assert_eq!(status.progress, 50);
        assert_eq!(status.error, "");
        assert!(status.is_running());
        assert!(!status.has_problem());
    }

    #[test]
    fn test_error_is_problem_regardless_of_state() {
        assert!(status(json!({"state": 0, "error": "E1"})).has_problem());
        assert!(status(json!({"state": 3, "error": "E1"})).has_problem());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let status = status(json!({}));
        assert_eq!(status, DeviceStatus::default());
        assert!(!status.is_running());
        assert!(status.rtc.is_none());
        assert!(status.relay_mode.is_none());
    }

    #[test]
    fn test_all_fields() {
        let status = status(json!({
            "state": 1, "progress": 10, "error": null, "rtc": "12:00", "sens": 7,
            "mode": 2, "manual": 1, "stepNum": 3, "relayMode": 4
        }));
        assert_eq!(status.error, "");
        assert_eq!(status.rtc.as_deref(), Some("12:00"));
        assert_eq!(status.sens.as_deref(), Some("7"));
        assert_eq!((status.mode, status.manual, status.step_num), (2, 1, 3));
        assert_eq!(status.relay_mode, Some(4));
    }
}
