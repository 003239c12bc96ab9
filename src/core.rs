pub mod comfort;
pub mod current_action;
pub mod demand_response;
pub mod device;
pub mod forecast;
pub mod mode;
pub mod plan;

pub use self::{
    comfort::{ComfortRisk, ComfortRiskRequest},
    current_action::CurrentAction,
    demand_response::{DemandResponseEvent, DemandResponseRequest, Severity},
    device::{Device, DeviceRegistration},
    forecast::Forecast,
    mode::ModeCategory,
    plan::{DailyPlan, Slot},
};
