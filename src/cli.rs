use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::{
    api::Api,
    core::{
        DemandResponseRequest,
        DeviceRegistration,
        Severity,
        device::{HeatPumpType, InsulationLevel},
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[clap(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fleet overview: devices, their current actions, and the forecast.
    Dashboard(RefreshArgs),

    /// List the registered devices.
    Devices,

    /// Show the device with its current action and the daily plan.
    Device(DeviceArgs),

    /// Show the price and wind forecast.
    Forecast,

    /// Register a new device.
    Register(Box<RegisterArgs>),

    /// Trigger a demand response event.
    Trigger(TriggerArgs),

    /// Analyze the comfort risk of the device's daily plan.
    ComfortRisk(ComfortRiskArgs),

    /// Show the grid participation of the fleet.
    Grid,
}

#[derive(Parser)]
pub struct ApiArgs {
    /// Backend base URL.
    #[clap(long = "api-url", env = "LAMPO_API_URL", default_value = "http://localhost:8000")]
    pub base_url: Url,

    /// Request timeout in seconds.
    #[clap(long = "timeout-secs", env = "LAMPO_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: u64,
}

impl ApiArgs {
    pub fn try_new_api(&self) -> Result<Api> {
        Api::try_new(self.base_url.clone(), Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Copy, Clone, Parser)]
pub struct RefreshArgs {
    /// Reload periodically with the given interval, instead of loading once.
    #[clap(long = "refresh-secs", env = "LAMPO_REFRESH_SECS")]
    pub refresh_secs: Option<u64>,
}

impl RefreshArgs {
    #[must_use]
    pub fn interval(self) -> Option<Duration> {
        self.refresh_secs.filter(|secs| *secs != 0).map(Duration::from_secs)
    }
}

#[derive(Parser)]
pub struct DeviceArgs {
    pub device_id: String,

    /// Plan date, today by default.
    #[clap(long)]
    pub date: Option<NaiveDate>,

    #[clap(flatten)]
    pub refresh: RefreshArgs,
}

#[derive(Parser)]
pub struct ComfortRiskArgs {
    pub device_id: String,

    /// Plan date, today by default.
    #[clap(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Parser)]
pub struct RegisterArgs {
    #[clap(long)]
    pub device_id: String,

    #[clap(long)]
    pub name: String,

    #[clap(long)]
    pub latitude: f64,

    #[clap(long)]
    pub longitude: f64,

    #[clap(long, value_enum)]
    pub insulation_level: InsulationLevel,

    /// Square metres.
    #[clap(long)]
    pub floor_area: f64,

    /// Cubic metres.
    #[clap(long)]
    pub volume: f64,

    #[clap(long, value_enum, default_value = "air-source")]
    pub heat_pump_type: HeatPumpType,

    /// Kilowatts.
    #[clap(long)]
    pub rated_power: f64,

    #[clap(long, default_value = "3.5")]
    pub cop_rating: f64,

    #[clap(long = "comfort-min", default_value = "18")]
    pub comfort_min_temp: f64,

    #[clap(long = "comfort-max", default_value = "24")]
    pub comfort_max_temp: f64,

    /// Participate in the virtual power plant.
    #[clap(long = "vpp")]
    pub vpp_enabled: bool,
}

impl From<RegisterArgs> for DeviceRegistration {
    fn from(args: RegisterArgs) -> Self {
        Self::builder()
            .device_id(args.device_id)
            .name(args.name)
            .latitude(args.latitude)
            .longitude(args.longitude)
            .insulation_level(args.insulation_level)
            .floor_area(args.floor_area)
            .volume(args.volume)
            .heat_pump_type(args.heat_pump_type)
            .rated_power(args.rated_power)
            .cop_rating(args.cop_rating)
            .comfort_min_temp(args.comfort_min_temp)
            .comfort_max_temp(args.comfort_max_temp)
            .vpp_enabled(args.vpp_enabled)
            .build()
    }
}

#[derive(Parser)]
pub struct TriggerArgs {
    /// Event duration, 5–60 minutes.
    #[clap(long, default_value = "15")]
    pub duration_minutes: u32,

    #[clap(long, value_enum, default_value = "normal")]
    pub severity: Severity,

    /// Affected bidding areas.
    #[clap(long = "area", value_delimiter = ',', default_value = "FI")]
    pub affected_areas: Vec<String>,
}

impl From<TriggerArgs> for DemandResponseRequest {
    fn from(args: TriggerArgs) -> Self {
        Self::builder()
            .duration_minutes(args.duration_minutes)
            .severity(args.severity)
            .affected_areas(args.affected_areas)
            .build()
    }
}
