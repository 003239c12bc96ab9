mod extremes;
pub mod fleet;
mod forecast;

pub use self::{
    extremes::{Extremes, average, best_window, extremes},
    fleet::FleetSummary,
    forecast::ForecastSummary,
};
