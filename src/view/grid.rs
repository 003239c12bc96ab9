use crate::{
    api::Api,
    core::{DemandResponseEvent, DemandResponseRequest, Device},
    fetch::{self, Fetched},
    prelude::*,
    statistics::FleetSummary,
};

/// Grid participation of the fleet.
#[must_use]
pub struct GridControl {
    pub devices: Fetched<Vec<Device>>,
    pub fleet: FleetSummary,
}

impl GridControl {
    #[instrument(skip_all, name = "Loading the grid control…")]
    pub async fn load(api: &Api) -> Self {
        let devices = fetch::or_default(api.list_devices(), Vec::new()).await;
        let fleet = FleetSummary::new(devices.get());
        Self { devices, fleet }
    }

    /// Participating devices, as they would respond to an event.
    pub fn participants(&self) -> impl Iterator<Item = &Device> {
        self.devices.get().iter().filter(|device| device.vpp_enabled)
    }
}

/// Trigger the event. Unlike the loads, a failure here is reported to the user.
pub async fn trigger(api: &Api, request: &DemandResponseRequest) -> Result<DemandResponseEvent> {
    api.trigger_demand_response(request).await
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;
    use crate::{
        api::{StatusError, tests::api},
        core::Severity,
    };

    #[tokio::test]
    async fn test_trigger_independent_of_device_list() -> Result {
        let mut server = Server::new_async().await;
        server.mock("GET", "/devices").with_status(500).create_async().await;
        let trigger_mock = server
            .mock("POST", "/grid/demand-response")
            .with_status(200)
            .with_body(r#"{"event_id": "dr-7", "participants": 0, "estimated_reduction_kw": 0.0}"#)
            .create_async()
            .await;
        let api = api(&server)?;

        let grid = GridControl::load(&api).await;
        assert_eq!(grid.fleet.n_devices, 0);
        assert_eq!(grid.participants().count(), 0);

        let request = DemandResponseRequest::builder().duration_minutes(30).build();
        let event = trigger(&api, &request).await?;
        assert_eq!(event.event_id, "dr-7");
        trigger_mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_trigger_failing_backend_is_explicit() -> Result {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/grid/demand-response")
            .with_status(503)
            .with_body(r#"{"detail": "Grid operator unavailable"}"#)
            .create_async()
            .await;

        let request = DemandResponseRequest::builder()
            .duration_minutes(15)
            .severity(Severity::Critical)
            .build();
        let error = trigger(&api(&server)?, &request).await.unwrap_err();
        assert_eq!(error.downcast_ref::<StatusError>().unwrap().detail, "Grid operator unavailable");
        Ok(())
    }
}
