//! Vacuum state, fan speed and feature vocabularies

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Host vacuum states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VacuumState {
    Cleaning,
    Docked,
    Error,
    Idle,
    Paused,
    Returning,
}

impl VacuumState {
    /// Map a SwitchBot `workingStatus` to a host state
    ///
    /// Covers both the S1/K10 vocabulary (`StandBy`, `Clearing`, …) and the
    /// S10 one (`standBy`, `cleanAll`, …). Unknown strings map to `None`.
    pub fn from_switchbot(status: &str) -> Option<Self> {
        let state = match status {
            "StandBy" | "Dormant" | "standBy" => VacuumState::Idle,
            "Clearing" | "InRemoteControl" => VacuumState::Cleaning,
            "Paused" => VacuumState::Paused,
            "GotoChargeBase" | "backToCharge" => VacuumState::Returning,
            "Charging" | "ChargeDone" | "InDustCollecting" => VacuumState::Docked,
            "InTrouble" => VacuumState::Error,
            "explore" | "cleanAll" | "cleanArea" | "cleanRoom" | "fillWater" | "deepWashing"
            | "markingWaterBase" | "drying" | "collectDust" | "remoteControl"
            | "cleanWithExplorer" | "fillWaterForHumi" | "markingHumi" => VacuumState::Cleaning,
            _ => return None,
        };
        Some(state)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VacuumState::Cleaning => "cleaning",
            VacuumState::Docked => "docked",
            VacuumState::Error => "error",
            VacuumState::Idle => "idle",
            VacuumState::Paused => "paused",
            VacuumState::Returning => "returning",
        }
    }
}

impl fmt::Display for VacuumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suction levels, with their SwitchBot `fanLevel`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Quiet,
    #[default]
    Standard,
    Strong,
    Max,
}

impl FanSpeed {
    pub const ALL: [FanSpeed; 4] = [
        FanSpeed::Quiet,
        FanSpeed::Standard,
        FanSpeed::Strong,
        FanSpeed::Max,
    ];

    pub fn fan_level(&self) -> u8 {
        match self {
            FanSpeed::Quiet => 1,
            FanSpeed::Standard => 2,
            FanSpeed::Strong => 3,
            FanSpeed::Max => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FanSpeed::Quiet => "quiet",
            FanSpeed::Standard => "standard",
            FanSpeed::Strong => "strong",
            FanSpeed::Max => "max",
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FanSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quiet" => Ok(FanSpeed::Quiet),
            "standard" => Ok(FanSpeed::Standard),
            "strong" => Ok(FanSpeed::Strong),
            "max" => Ok(FanSpeed::Max),
            _ => Err(format!("Invalid fan speed: {}", s)),
        }
    }
}

/// Capabilities the vacuum entity advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VacuumFeature {
    Battery,
    FanSpeed,
    Pause,
    ReturnHome,
    Start,
    State,
    SendCommand,
    CleanSpot,
}

impl VacuumFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacuumFeature::Battery => "battery",
            VacuumFeature::FanSpeed => "fan_speed",
            VacuumFeature::Pause => "pause",
            VacuumFeature::ReturnHome => "return_home",
            VacuumFeature::Start => "start",
            VacuumFeature::State => "state",
            VacuumFeature::SendCommand => "send_command",
            VacuumFeature::CleanSpot => "clean_spot",
        }
    }
}

pub const SUPPORTED_FEATURES: [VacuumFeature; 8] = [
    VacuumFeature::Battery,
    VacuumFeature::FanSpeed,
    VacuumFeature::Pause,
    VacuumFeature::ReturnHome,
    VacuumFeature::Start,
    VacuumFeature::State,
    VacuumFeature::SendCommand,
    VacuumFeature::CleanSpot,
];
