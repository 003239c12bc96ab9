use std::ops::Range;

use crate::{
    core::{Forecast, forecast::GREEN_WIND_PERCENTAGE},
    statistics::{Extremes, average, best_window},
};

/// Length of the recommended heating window.
pub const HEATING_WINDOW_HOURS: usize = 3;

/// Rough consumption used to estimate savings of heating in the cheapest window instead of the peak.
pub const SAVINGS_FACTOR: f64 = 1.5;

/// Derived figures of a forecast.
///
/// Every field is `None` for an empty forecast: there is no data, and it must be rendered as such.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastSummary {
    pub current_price: Option<f64>,
    pub average_price: Option<f64>,
    pub price_extremes: Option<Extremes>,
    pub average_wind: Option<f64>,
    pub wind_extremes: Option<Extremes>,
    pub heating_window: Option<Range<usize>>,
}

impl ForecastSummary {
    pub fn new(forecast: &Forecast) -> Self {
        Self {
            current_price: forecast.first().map(|sample| sample.price),
            average_price: average(forecast.prices()),
            price_extremes: forecast.price_extremes(),
            average_wind: average(forecast.winds()),
            wind_extremes: forecast.wind_extremes(),
            heating_window: best_window(forecast.prices(), HEATING_WINDOW_HOURS),
        }
    }

    /// Estimated savings of heating in the cheapest hour instead of the peak one.
    #[must_use]
    pub fn estimated_savings(&self) -> Option<f64> {
        self.price_extremes.map(|extremes| extremes.spread() * SAVINGS_FACTOR)
    }

    /// Status flags of the sample at the given position.
    pub fn status(&self, forecast: &Forecast, index: usize) -> SampleStatus {
        SampleStatus {
            lowest: self.price_extremes.is_some_and(|extremes| extremes.is_min(index)),
            peak: self.price_extremes.is_some_and(|extremes| extremes.is_max(index)),
            green: forecast.get(index).is_some_and(|sample| sample.wind > GREEN_WIND_PERCENTAGE),
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SampleStatus {
    pub lowest: bool,
    pub peak: bool,
    pub green: bool,
}
