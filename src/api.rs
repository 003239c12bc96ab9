mod client;
mod status;

use std::time::Duration;

use chrono::NaiveDate;
use derive_more::Display;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};

pub use self::status::StatusError;
use crate::{
    core::{
        ComfortRisk,
        ComfortRiskRequest,
        CurrentAction,
        DailyPlan,
        DemandResponseEvent,
        DemandResponseRequest,
        Device,
        DeviceRegistration,
        Forecast,
        demand_response::DemandResponseAck,
        forecast::ForecastResponse,
    },
    prelude::*,
};

/// Heat-pump fleet backend.
///
/// Every call is fallible: degrading to placeholders is up to the caller.
pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn try_new(base_url: Url, timeout: Duration) -> Result<Self> {
        Ok(Self { client: client::try_new(timeout)?, base_url })
    }

    #[instrument(skip_all, name = "Fetching the devices…")]
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self.get(&["devices"]).await?;
        debug!(n_devices = devices.len(), "fetched");
        Ok(devices)
    }

    #[instrument(skip_all, name = "Fetching the device…", fields(device_id = device_id))]
    pub async fn get_device(&self, device_id: &str) -> Result<Device> {
        self.get(&["devices", device_id]).await
    }

    /// Validate the registration locally, and only then submit it.
    #[instrument(skip_all, name = "Registering the device…", fields(device_id = %registration.device_id))]
    pub async fn register_device(&self, registration: &DeviceRegistration) -> Result<Device> {
        registration.validate()?;
        let device: Device = self
            .post(&["devices", "register"], registration)
            .await
            .context("failed to register the device")?;
        info!(id = device.id, "registered");
        Ok(device)
    }

    #[instrument(skip_all, name = "Fetching the current action…", fields(device_id = device_id))]
    pub async fn get_current_action(&self, device_id: &str) -> Result<CurrentAction> {
        let action: CurrentAction = self.get(&["strategy", "current-action", device_id]).await?;
        if action.device_id != device_id {
            return Err(UnexpectedDevice {
                requested: device_id.to_string(),
                received: action.device_id,
            }
            .into());
        }
        Ok(action)
    }

    /// Fetch the plan for the given date, or for today when omitted.
    #[instrument(
        skip_all,
        name = "Fetching the daily plan…",
        fields(device_id = device_id, date = ?target_date),
    )]
    pub async fn get_daily_plan(
        &self,
        device_id: &str,
        target_date: Option<NaiveDate>,
    ) -> Result<DailyPlan> {
        #[derive(Serialize)]
        struct Request<'a> {
            device_id: &'a str,

            #[serde(skip_serializing_if = "Option::is_none")]
            target_date: Option<NaiveDate>,
        }

        let plan: DailyPlan = self
            .post(&["strategy", "daily-plan"], &Request { device_id, target_date })
            .await?;
        debug!(n_actions = plan.hourly_actions.len(), "fetched");
        Ok(plan)
    }

    #[instrument(skip_all, name = "Fetching the price and carbon forecast…")]
    pub async fn get_forecast(&self) -> Result<Forecast> {
        let response: ForecastResponse = self.get(&["forecasts", "price-carbon"]).await?;
        let forecast = Forecast::from(response);
        debug!(n_samples = forecast.len(), "fetched");
        Ok(forecast)
    }

    /// Validate the duration locally, and only then trigger the event.
    #[instrument(
        skip_all,
        name = "Triggering the demand response…",
        fields(duration_minutes = request.duration_minutes, severity = ?request.severity),
    )]
    pub async fn trigger_demand_response(
        &self,
        request: &DemandResponseRequest,
    ) -> Result<DemandResponseEvent> {
        request.validate()?;
        let ack: DemandResponseAck = self
            .post(&["grid", "demand-response"], request)
            .await
            .context("failed to trigger the demand response event")?;
        let event = DemandResponseEvent::new(request, ack);
        info!(
            event_id = %event.event_id,
            participants = event.participants,
            estimated_reduction = event.estimated_reduction,
            "triggered",
        );
        Ok(event)
    }

    #[instrument(skip_all, name = "Analyzing the comfort risk…", fields(device_id = %request.device_id))]
    pub async fn analyze_comfort_risk(&self, request: &ComfortRiskRequest) -> Result<ComfortRisk> {
        self.post(&["analytics", "comfort-risk"], request).await
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R> {
        self.send(self.client.get(self.url(segments)?)).await
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<R> {
        self.send(self.client.post(self.url(segments)?).json(body)).await
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let response = request.send().await.context("the backend is unreachable")?;
        let status = response.status();
        let body = response.text().await.context("failed to read the response")?;
        if !status.is_success() {
            return Err(StatusError::new(status, &body).into());
        }
        serde_json::from_str(&body).context("malformed response")
    }
}

/// The response belongs to another device than the requested one.
#[derive(Clone, Debug, Eq, PartialEq, Display, derive_more::Error)]
#[display("requested `{requested}` but received `{received}`")]
pub struct UnexpectedDevice {
    pub requested: String,
    pub received: String,
}
