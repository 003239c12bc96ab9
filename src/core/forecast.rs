use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    prelude::*,
    statistics::{Extremes, extremes},
};

/// Wind share above which an hour is considered «green».
pub const GREEN_WIND_PERCENTAGE: f64 = 70.0;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,

    /// Day-ahead price in EUR/MWh.
    #[serde(rename = "price_eur_mwh")]
    pub price: f64,

    /// Share of wind generation, percent.
    #[serde(rename = "wind_percentage")]
    pub wind: f64,
}

/// Price and wind forecast, ordered by strictly increasing timestamps.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, derive_more::Deref, derive_more::IntoIterator)]
#[into_iterator(owned, ref)]
pub struct Forecast(Vec<ForecastSample>);

impl Forecast {
    pub fn new(mut samples: Vec<ForecastSample>) -> Self {
        if !samples.is_sorted_by_key(|sample| sample.timestamp) {
            warn!("the forecast is out of order, sorting");
            samples.sort_by_key(|sample| sample.timestamp);
        }
        let n_samples = samples.len();
        samples.dedup_by_key(|sample| sample.timestamp);
        if samples.len() != n_samples {
            warn!(n_dropped = n_samples - samples.len(), "dropped duplicate timestamps");
        }
        Self(samples)
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|sample| sample.price)
    }

    pub fn winds(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|sample| sample.wind)
    }

    #[must_use]
    pub fn price_extremes(&self) -> Option<Extremes> {
        extremes(self.prices())
    }

    #[must_use]
    pub fn wind_extremes(&self) -> Option<Extremes> {
        extremes(self.winds())
    }
}

/// The forecast endpoint returned a bare array in early revisions, and wraps it now.
#[serde_as]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ForecastResponse {
    Wrapped {
        #[serde_as(as = "serde_with::VecSkipError<_>")]
        forecast: Vec<ForecastSample>,
    },

    Bare(#[serde_as(as = "serde_with::VecSkipError<_>")] Vec<ForecastSample>),
}

impl From<ForecastResponse> for Forecast {
    fn from(response: ForecastResponse) -> Self {
        match response {
            ForecastResponse::Wrapped { forecast } | ForecastResponse::Bare(forecast) => {
                Self::new(forecast)
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    /// Hourly forecast starting at midnight.
    pub fn forecast(points: &[(f64, f64)]) -> Forecast {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        Forecast::new(
            points
                .iter()
                .zip(0..)
                .map(|(&(price, wind), hour)| ForecastSample {
                    timestamp: midnight + TimeDelta::hours(hour),
                    price,
                    wind,
                })
                .collect(),
        )
    }

    #[test]
    fn test_deserialize_wrapped_ok() -> Result {
        // language=json
        const BODY: &str = r#"{
            "forecast": [
                {"timestamp": "2024-01-15T00:00:00Z", "price_eur_mwh": 50.0, "wind_percentage": 40.0},
                {"timestamp": "2024-01-15T01:00:00Z", "price_eur_mwh": "oops", "wind_percentage": 40.0},
                {"timestamp": "2024-01-15T02:00:00Z", "price_eur_mwh": 30.0, "wind_percentage": 75.5}
            ]
        }"#;
        let forecast = Forecast::from(serde_json::from_str::<ForecastResponse>(BODY)?);
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[1].wind, 75.5);
        Ok(())
    }

    #[test]
    fn test_deserialize_bare_ok() -> Result {
        // language=json
        const BODY: &str = r#"[
            {"timestamp": "2024-01-15T00:00:00Z", "price_eur_mwh": 50.0, "wind_percentage": 40.0}
        ]"#;
        let forecast = Forecast::from(serde_json::from_str::<ForecastResponse>(BODY)?);
        assert_eq!(forecast.len(), 1);
        Ok(())
    }

    #[test]
    fn test_new_sorts_and_deduplicates() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let t1 = t0 + TimeDelta::hours(1);
        let forecast = Forecast::new(vec![
            ForecastSample { timestamp: t1, price: 2.0, wind: 0.0 },
            ForecastSample { timestamp: t0, price: 1.0, wind: 0.0 },
            ForecastSample { timestamp: t1, price: 3.0, wind: 0.0 },
        ]);
        assert_eq!(forecast.prices().collect::<Vec<_>>(), [1.0, 2.0]);
        assert!(forecast.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp));
    }
}
