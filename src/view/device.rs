use chrono::NaiveDate;

use crate::{
    api::Api,
    core::{CurrentAction, DailyPlan, Device, Slot, plan::N_HOURS},
    fetch::{self, Fetched},
    prelude::*,
};

/// Single device with its current action and the daily plan.
#[must_use]
#[derive(Clone)]
pub struct DeviceDetail {
    pub device: Fetched<Device>,
    pub action: Fetched<CurrentAction>,
    pub plan: Fetched<DailyPlan>,
    pub slots: [Slot; N_HOURS],
}

impl DeviceDetail {
    #[instrument(skip_all, name = "Loading the device…", fields(device_id = device_id))]
    pub async fn load(
        api: &Api,
        device_id: &str,
        date: Option<NaiveDate>,
        previous: Option<Self>,
    ) -> Self {
        let last_known = previous
            .map(|previous| previous.action.into_inner())
            .filter(|action| action.device_id == device_id)
            .unwrap_or_else(|| CurrentAction::unknown(device_id));
        let (device, action, plan) = tokio::join!(
            fetch::or_default(api.get_device(device_id), Device::placeholder(device_id)),
            fetch::or_default(api.get_current_action(device_id), last_known),
            fetch::or_default(api.get_daily_plan(device_id, date), DailyPlan::empty(device_id, date)),
        );
        let slots = plan.get().normalize();
        let detail = Self { device, action, plan, slots };
        debug!(n_gaps = detail.n_gaps(), "loaded");
        detail
    }

    #[must_use]
    pub fn n_gaps(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_gap()).count()
    }
}
