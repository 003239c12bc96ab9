use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{core::ModeCategory, prelude::*};

pub const N_HOURS: usize = 24;

/// Operating instruction for a single hour of the day.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourlyAction {
    /// Hour of the day, `0..24`.
    pub hour: u8,

    pub mode: String,

    #[serde(rename = "target_temp")]
    pub target_temperature: f64,

    #[serde(default)]
    pub reason: String,

    /// Price context in EUR/MWh.
    #[serde(default)]
    pub price: Option<f64>,

    /// Carbon context in gCO₂/kWh.
    #[serde(default)]
    pub carbon: Option<f64>,
}

impl HourlyAction {
    pub fn category(&self) -> ModeCategory {
        ModeCategory::classify(&self.mode)
    }
}

/// Daily plan as computed by the planning service.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub device_id: String,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Malformed actions are skipped, leaving their hours as gaps.
    #[serde_as(as = "serde_with::VecSkipError<_>")]
    #[serde(default)]
    pub hourly_actions: Vec<HourlyAction>,

    #[serde(default)]
    pub estimated_cost: Option<f64>,

    #[serde(default)]
    pub estimated_carbon: Option<f64>,
}

impl DailyPlan {
    /// Plan without any actions, rendered as a day full of gaps.
    pub fn empty(device_id: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            device_id: device_id.into(),
            date,
            hourly_actions: Vec::new(),
            estimated_cost: None,
            estimated_carbon: None,
        }
    }

    pub fn normalize(&self) -> [Slot; N_HOURS] {
        normalize(&self.hourly_actions)
    }
}

/// One hour of a normalized plan.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    Planned(HourlyAction),

    /// No action claims this hour: treated as idle, without price or carbon context.
    Gap(u8),
}

impl Slot {
    pub const fn hour(&self) -> u8 {
        match self {
            Self::Planned(action) => action.hour,
            Self::Gap(hour) => *hour,
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour())
    }

    pub fn category(&self) -> ModeCategory {
        match self {
            Self::Planned(action) => action.category(),
            Self::Gap(_) => ModeCategory::Idle,
        }
    }

    #[must_use]
    pub const fn action(&self) -> Option<&HourlyAction> {
        match self {
            Self::Planned(action) => Some(action),
            Self::Gap(_) => None,
        }
    }

    #[must_use]
    pub const fn is_gap(&self) -> bool {
        matches!(self, Self::Gap(_))
    }

    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.action().map(|action| action.target_temperature)
    }
}

/// Reshape the actions into exactly one slot per hour, ordered by hour.
///
/// When several actions claim the same hour, the last one wins.
#[allow(clippy::cast_possible_truncation)]
#[instrument(skip_all, level = Level::DEBUG, fields(n_actions = actions.len()))]
pub fn normalize(actions: &[HourlyAction]) -> [Slot; N_HOURS] {
    let mut slots: [Slot; N_HOURS] = std::array::from_fn(|hour| Slot::Gap(hour as u8));
    for action in actions {
        match slots.get_mut(usize::from(action.hour)) {
            Some(slot) => {
                if !slot.is_gap() {
                    debug!(action.hour, "overwriting a duplicate hour");
                }
                *slot = Slot::Planned(action.clone());
            }
            None => {
                warn!(action.hour, "dropping an action outside of the day");
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(hour: u8, mode: &str) -> HourlyAction {
        HourlyAction {
            hour,
            mode: mode.to_string(),
            target_temperature: 21.0,
            reason: "Low price".to_string(),
            price: Some(30.0),
            carbon: Some(80.0),
        }
    }

    #[test]
    fn test_normalize_empty_is_all_gaps() {
        let slots = normalize(&[]);
        assert_eq!(slots.len(), 24);
        for (hour, slot) in slots.iter().enumerate() {
            assert_eq!(*slot, Slot::Gap(u8::try_from(hour).unwrap()));
            assert_eq!(slot.category(), ModeCategory::Idle);
            assert_eq!(slot.target_temperature(), None);
        }
    }

    #[test]
    fn test_normalize_last_duplicate_wins() {
        let slots = normalize(&[action(5, "heating"), action(5, "boost")]);
        assert_eq!(slots.len(), 24);
        assert_eq!(slots[5], Slot::Planned(action(5, "boost")));
        assert_eq!(slots[5].category(), ModeCategory::Boost);
        assert_eq!(slots.iter().filter(|slot| slot.is_gap()).count(), 23);
    }

    #[test]
    fn test_normalize_orders_by_hour() {
        let slots = normalize(&[action(23, "eco"), action(0, "heating"), action(12, "cooling")]);
        for (hour, slot) in slots.iter().enumerate() {
            assert_eq!(usize::from(slot.hour()), hour);
        }
        assert_eq!(slots[0].category(), ModeCategory::Heating);
        assert_eq!(slots[12].category(), ModeCategory::Cooling);
        assert_eq!(slots[23].category(), ModeCategory::Eco);
        assert_eq!(slots[23].label(), "23:00");
    }

    #[test]
    fn test_normalize_drops_out_of_range_hours() {
        let slots = normalize(&[action(24, "heating"), action(255, "boost")]);
        assert!(slots.iter().all(Slot::is_gap));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let actions = [action(3, "eco"), action(3, "heating"), action(7, "whatever")];
        assert_eq!(normalize(&actions), normalize(&actions));
        assert_eq!(normalize(&actions)[7].category(), ModeCategory::Idle);
    }

    #[test]
    fn test_deserialize_plan_ok() -> Result {
        // language=json
        const BODY: &str = r#"{
            "device_id": "HP-001",
            "date": "2024-01-15",
            "hourly_actions": [
                {"hour": 0, "mode": "eco", "target_temp": 20.0, "reason": "Comfort", "price": 30.0},
                {"hour": 1, "mode": "heating", "target_temp": 21.5, "reason": "Low price"}
            ],
            "estimated_cost": 1.25,
            "estimated_carbon": 3.5
        }"#;
        let plan: DailyPlan = serde_json::from_str(BODY)?;
        assert_eq!(plan.hourly_actions.len(), 2);
        assert_eq!(plan.hourly_actions[1].carbon, None);
        let slots = plan.normalize();
        assert_eq!(slots[1].target_temperature(), Some(21.5));
        assert!(slots[2].is_gap());
        Ok(())
    }

    #[test]
    fn test_deserialize_plan_skips_malformed_actions() -> Result {
        // language=json
        const BODY: &str = r#"{
            "device_id": "HP-001",
            "hourly_actions": [
                {"hour": 0, "mode": "eco", "target_temp": 20.0},
                {"hour": 1, "mode": "heating", "target_temp": 21.5},
                {"hour": 2, "mode": "boost"},
                {"hour": 300, "mode": "boost", "target_temp": 23.0},
                {"hour": 3, "mode": "heating", "target_temp": 22.0}
            ]
        }"#;
        let plan: DailyPlan = serde_json::from_str(BODY)?;
        assert_eq!(plan.hourly_actions.iter().map(|action| action.hour).collect::<Vec<_>>(), [0, 1, 3]);
        let slots = plan.normalize();
        assert_eq!(slots[0].target_temperature(), Some(20.0));
        assert_eq!(slots[1].target_temperature(), Some(21.5));
        assert!(slots[2].is_gap());
        assert_eq!(slots[3].category(), ModeCategory::Heating);
        assert_eq!(slots.iter().filter(|slot| slot.is_gap()).count(), 21);
        Ok(())
    }
}
