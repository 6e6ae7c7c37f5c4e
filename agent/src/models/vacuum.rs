//! SwitchBot vacuum status snapshot

use serde::Serialize;
use vendor_models::models::switchbot::VacuumStatusBody;

/// Point-in-time status of a robot vacuum
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VacuumStatus {
    pub battery: Option<i64>,
    pub online_status: Option<String>,
    /// Vendor working status string, e.g. `Charging`
    pub working_status: Option<String>,
    pub water_base_battery: Option<i64>,
}

impl VacuumStatus {
    pub fn is_online(&self) -> bool {
        self.online_status.as_deref() == Some("online")
    }
}

impl From<VacuumStatusBody> for VacuumStatus {
    fn from(body: VacuumStatusBody) -> Self {
        Self {
            battery: body.battery,
            online_status: body.online_status,
            working_status: body.working_status,
            water_base_battery: body.water_base_battery,
        }
    }
}
