use crate::{
    api::Api,
    core::Forecast,
    fetch::{self, Fetched},
    prelude::*,
    statistics::ForecastSummary,
};

#[must_use]
pub struct ForecastPage {
    pub forecast: Fetched<Forecast>,
    pub summary: ForecastSummary,
}

impl ForecastPage {
    #[instrument(skip_all, name = "Loading the forecast…")]
    pub async fn load(api: &Api) -> Self {
        let forecast = fetch::or_default(api.get_forecast(), Forecast::default()).await;
        let summary = ForecastSummary::new(forecast.get());
        Self { forecast, summary }
    }
}
