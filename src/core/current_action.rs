use serde::{Deserialize, Serialize};

use crate::core::ModeCategory;

/// What a device is doing right now.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrentAction {
    pub device_id: String,

    pub mode: String,

    #[serde(rename = "target_temp", default)]
    pub target_temperature: Option<f64>,

    #[serde(rename = "current_temp", default)]
    pub current_temperature: Option<f64>,

    #[serde(default)]
    pub reason: String,

    /// When the next change is planned, as reported by the backend (usually `HH:MM`).
    #[serde(default)]
    pub next_change: Option<String>,
}

impl CurrentAction {
    pub const UNKNOWN_MODE: &'static str = "unknown";

    /// Neutral state for a device we could not get the action for.
    pub fn unknown(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            mode: Self::UNKNOWN_MODE.to_string(),
            target_temperature: None,
            current_temperature: None,
            reason: String::new(),
            next_change: None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.mode == Self::UNKNOWN_MODE
    }

    pub fn category(&self) -> ModeCategory {
        ModeCategory::classify(&self.mode)
    }
}
