//! SwitchBot robot vacuum entity

use std::sync::Arc;

use entity_models::models::VacuumStateResponse;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::info;

use crate::coordinator::switchbot::VacuumSource;
use crate::coordinator::Coordinator;
use crate::errors::ApiError;
use crate::models::vacuum::VacuumStatus;
use crate::vacuum::state::{FanSpeed, VacuumFeature, VacuumState, SUPPORTED_FEATURES};

pub const ATTR_WATER_BASE_BATTERY: &str = "water_base_battery";

const CMD_START_CLEAN: &str = "startClean";
const CMD_PAUSE: &str = "pause";
const CMD_DOCK: &str = "dock";
const CMD_CHANGE_PARAM: &str = "changeParam";

/// Vacuum entity backed by a SwitchBot coordinator
///
/// State is read from the coordinator's latest snapshot. Commands are
/// forwarded to the cloud as-is and do not touch the snapshot; the next poll
/// picks up the effect.
pub struct VacuumEntity {
    coordinator: Arc<Coordinator<VacuumSource>>,
    fan_speed: RwLock<Option<FanSpeed>>,
}

impl VacuumEntity {
    pub fn new(coordinator: Arc<Coordinator<VacuumSource>>) -> Self {
        Self {
            coordinator,
            fan_speed: RwLock::new(None),
        }
    }

    pub fn coordinator(&self) -> &Arc<Coordinator<VacuumSource>> {
        &self.coordinator
    }

    fn snapshot(&self) -> Option<Arc<VacuumStatus>> {
        self.coordinator.data()
    }

    /// Host state, `None` before the first snapshot or for an unmapped status
    pub fn state(&self) -> Option<VacuumState> {
        self.snapshot()?
            .working_status
            .as_deref()
            .and_then(VacuumState::from_switchbot)
    }

    pub fn available(&self) -> bool {
        self.snapshot().map(|s| s.is_online()).unwrap_or(false)
    }

    pub fn battery_level(&self) -> Option<i64> {
        self.snapshot()?.battery
    }

    /// Fan speed last selected through this entity
    pub async fn fan_speed(&self) -> Option<FanSpeed> {
        *self.fan_speed.read().await
    }

    pub fn fan_speed_list(&self) -> &'static [FanSpeed] {
        &FanSpeed::ALL
    }

    pub fn supported_features(&self) -> &'static [VacuumFeature] {
        &SUPPORTED_FEATURES
    }

    pub fn extra_state_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        if let Some(level) = self.snapshot().and_then(|s| s.water_base_battery) {
            attributes.insert(ATTR_WATER_BASE_BATTERY.to_string(), json!(level));
        }
        attributes
    }

    /// Start or resume cleaning at the selected fan speed
    pub async fn start(&self) -> Result<(), ApiError> {
        let fan_speed = self.fan_speed().await.unwrap_or_default();
        let parameter = json!({
            "action": "sweep",
            "param": clean_params(fan_speed),
        });
        self.send_command(CMD_START_CLEAN, Some(parameter)).await
    }

    pub async fn pause(&self) -> Result<(), ApiError> {
        self.send_command(CMD_PAUSE, None).await
    }

    pub async fn return_to_base(&self) -> Result<(), ApiError> {
        self.send_command(CMD_DOCK, None).await
    }

    pub async fn set_fan_speed(&self, fan_speed: FanSpeed) -> Result<(), ApiError> {
        *self.fan_speed.write().await = Some(fan_speed);
        info!("Vacuum fan speed set to {}", fan_speed);
        self.send_command(CMD_CHANGE_PARAM, Some(clean_params(fan_speed)))
            .await
    }

    /// Forward a raw command
    pub async fn send_command(&self, command: &str, params: Option<Value>) -> Result<(), ApiError> {
        let source = self.coordinator.source();
        source
            .client()
            .send_command(source.device_id(), command, params)
            .await
    }

    pub async fn to_response(&self) -> VacuumStateResponse {
        VacuumStateResponse {
            state: self.state().map(|s| s.as_str().to_string()),
            available: self.available(),
            battery_level: self.battery_level(),
            fan_speed: self.fan_speed().await.map(|f| f.as_str().to_string()),
            fan_speed_list: self
                .fan_speed_list()
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
            supported_features: self
                .supported_features()
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
            extra_state_attributes: self.extra_state_attributes(),
            coordinator: self.coordinator.status().await,
        }
    }
}

fn clean_params(fan_speed: FanSpeed) -> Value {
    json!({
        "fanLevel": fan_speed.fan_level(),
        "waterLevel": 1,
        "times": 1,
    })
}
