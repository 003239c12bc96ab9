#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod fetch;
mod prelude;
mod statistics;
mod tables;
mod view;

use std::{collections::BTreeMap, time::Duration};

use clap::{Parser, crate_version};
use tokio::time::sleep;

use crate::{
    api::Api,
    cli::{Args, Command, ComfortRiskArgs, DeviceArgs, RefreshArgs},
    core::{DemandResponseRequest, DeviceRegistration},
    fetch::Fetched,
    prelude::*,
    tables::{
        build_comfort_risk_table,
        build_current_action_table,
        build_device_table,
        build_devices_table,
        build_event_table,
        build_fleet_table,
        build_forecast_summary_table,
        build_forecast_table,
        build_plan_table,
    },
    view::{ComfortReport, Dashboard, DeviceDetail, ForecastPage, GridControl, ViewState, grid},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let api = args.api.try_new_api()?;
    info!(base_url = %args.api.base_url, "connecting…");

    match args.command {
        Command::Dashboard(args) => {
            dashboard(&api, args).await;
        }
        Command::Devices => {
            let grid = GridControl::load(&api).await;
            warn_if_fallback("devices", &grid.devices);
            println!("{}", build_devices_table(grid.devices.get(), &BTreeMap::new()));
        }
        Command::Device(args) => {
            device(&api, &args).await;
        }
        Command::Forecast => {
            let page = ForecastPage::load(&api).await;
            warn_if_fallback("forecast", &page.forecast);
            println!("{}", build_forecast_table(page.forecast.get(), &page.summary));
            println!("{}", build_forecast_summary_table(page.forecast.get(), &page.summary));
        }
        Command::Register(args) => {
            let registration = DeviceRegistration::from(*args);
            let mut state = ViewState::default();
            let device = state.submit(api.register_device(&registration)).await?;
            println!("{}", build_device_table(device));
        }
        Command::Trigger(args) => {
            let request = DemandResponseRequest::from(args);
            let mut state = ViewState::default();
            let event = state.submit(grid::trigger(&api, &request)).await?;
            println!("{}", build_event_table(event));
        }
        Command::ComfortRisk(ComfortRiskArgs { device_id, date }) => {
            let report = ComfortReport::load(&api, &device_id, date).await;
            warn_if_fallback("plan", &report.plan);
            warn_if_fallback("comfort risk", &report.risk);
            println!("{}", build_comfort_risk_table(report.risk.get()));
        }
        Command::Grid => {
            let grid = GridControl::load(&api).await;
            warn_if_fallback("devices", &grid.devices);
            println!("{}", build_fleet_table(&grid.fleet));
            let participants = grid.participants().cloned().collect::<Vec<_>>();
            println!("{}", build_devices_table(&participants, &BTreeMap::new()));
        }
    }

    info!("done!");
    Ok(())
}

async fn dashboard(api: &Api, args: RefreshArgs) {
    let mut state = ViewState::default();
    loop {
        if let Some(dashboard) = state.reload(|previous| Dashboard::load(api, previous)).await {
            warn_if_fallback("devices", &dashboard.devices);
            warn_if_fallback("forecast", &dashboard.forecast);
            println!("{}", build_fleet_table(&dashboard.fleet));
            println!("{}", build_devices_table(dashboard.devices.get(), &dashboard.actions));
            println!(
                "{}",
                build_forecast_summary_table(dashboard.forecast.get(), &dashboard.forecast_summary),
            );
        }
        if !wait(args.interval()).await {
            break;
        }
    }
}

async fn device(api: &Api, args: &DeviceArgs) {
    let mut state = ViewState::default();
    loop {
        let detail = state
            .reload(|previous| DeviceDetail::load(api, &args.device_id, args.date, previous))
            .await;
        if let Some(detail) = detail {
            warn_if_fallback("device", &detail.device);
            warn_if_fallback("current action", &detail.action);
            warn_if_fallback("plan", &detail.plan);
            println!("{}", build_device_table(detail.device.get()));
            println!("{}", build_current_action_table(detail.action.get()));
            println!("{}", build_plan_table(detail.plan.get(), &detail.slots));
        }
        if !wait(args.refresh.interval()).await {
            break;
        }
    }
}

/// Sleep until the next refresh, or return `false` if refreshing is off.
async fn wait(interval: Option<Duration>) -> bool {
    let Some(interval) = interval else {
        return false;
    };
    info!(?interval, "sleeping until the next refresh…");
    sleep(interval).await;
    true
}

fn warn_if_fallback<T>(what: &str, fetched: &Fetched<T>) {
    if let Some(reason) = fetched.reason() {
        warn!(%reason, "showing placeholder {what}");
    }
}
