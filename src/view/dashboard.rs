use std::collections::BTreeMap;

use crate::{
    api::Api,
    core::{CurrentAction, Device, Forecast},
    fetch::{self, Fetched},
    prelude::*,
    statistics::{FleetSummary, ForecastSummary},
};

/// Fleet overview: devices with their current actions, and the forecast.
#[must_use]
#[derive(Clone)]
pub struct Dashboard {
    pub devices: Fetched<Vec<Device>>,

    /// Current actions by device ID.
    pub actions: BTreeMap<String, Fetched<CurrentAction>>,

    pub forecast: Fetched<Forecast>,
    pub fleet: FleetSummary,
    pub forecast_summary: ForecastSummary,
}

impl Dashboard {
    /// Load the dashboard, falling back to the previous actions for devices that do not respond.
    #[instrument(skip_all, name = "Loading the dashboard…")]
    pub async fn load(api: &Api, previous: Option<Self>) -> Self {
        let (devices, forecast) = tokio::join!(
            fetch::or_default(api.list_devices(), Vec::new()),
            fetch::or_default(api.get_forecast(), Forecast::default()),
        );

        let mut last_known = previous.map(|previous| previous.actions).unwrap_or_default();
        let actions = fetch::many(devices.get().iter().map(|device| {
            let fallback = last_known
                .remove(&device.device_id)
                .map_or_else(|| CurrentAction::unknown(&device.device_id), Fetched::into_inner);
            (device.device_id.clone(), api.get_current_action(&device.device_id), fallback)
        }))
        .await;

        let fleet = FleetSummary::new(devices.get());
        let forecast_summary = ForecastSummary::new(forecast.get());
        info!(
            n_devices = fleet.n_devices,
            n_participating = fleet.n_participating,
            n_samples = forecast.get().len(),
            "loaded",
        );
        Self { devices, actions, forecast, fleet, forecast_summary }
    }
}
