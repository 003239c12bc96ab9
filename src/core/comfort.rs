use serde::{Deserialize, Serialize};

use crate::core::plan::Slot;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub hour: u8,
    pub mode: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComfortRiskRequest {
    pub device_id: String,
    pub proposed_schedule: Vec<ScheduleEntry>,
}

impl ComfortRiskRequest {
    /// Propose the planned hours of a normalized plan, gaps are left out.
    pub fn from_slots(device_id: impl Into<String>, slots: &[Slot]) -> Self {
        let proposed_schedule = slots
            .iter()
            .filter_map(Slot::action)
            .map(|action| ScheduleEntry { hour: action.hour, mode: action.mode.clone() })
            .collect();
        Self { device_id: device_id.into(), proposed_schedule }
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ComfortRisk {
    pub risk_level: String,

    #[serde(default)]
    pub risk_hours: Vec<u8>,

    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ComfortRisk {
    pub const UNKNOWN_LEVEL: &'static str = "unknown";

    pub fn unknown() -> Self {
        Self {
            risk_level: Self::UNKNOWN_LEVEL.to_string(),
            risk_hours: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}
