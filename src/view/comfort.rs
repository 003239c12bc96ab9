use chrono::NaiveDate;

use crate::{
    api::Api,
    core::{ComfortRisk, ComfortRiskRequest, DailyPlan},
    fetch::{self, Fetched},
    prelude::*,
};

/// Comfort risk of the device's daily plan.
#[must_use]
pub struct ComfortReport {
    pub plan: Fetched<DailyPlan>,
    pub risk: Fetched<ComfortRisk>,
}

impl ComfortReport {
    /// Fetch the plan, and submit its planned hours for the analysis.
    #[instrument(skip_all, name = "Loading the comfort risk…", fields(device_id = device_id))]
    pub async fn load(api: &Api, device_id: &str, date: Option<NaiveDate>) -> Self {
        let plan =
            fetch::or_default(api.get_daily_plan(device_id, date), DailyPlan::empty(device_id, date))
                .await;
        let request = ComfortRiskRequest::from_slots(device_id, &plan.get().normalize());
        if request.proposed_schedule.is_empty() {
            warn!("the plan is empty, the analysis will have nothing to assess");
        }
        let risk = fetch::or_default(api.analyze_comfort_risk(&request), ComfortRisk::unknown()).await;
        Self { plan, risk }
    }
}
