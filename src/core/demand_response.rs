use std::ops::RangeInclusive;

use bon::Builder;
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub const DURATION_MINUTES_RANGE: RangeInclusive<u32> = 5..=60;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor adjustments within the comfort band.
    #[default]
    Normal,

    /// Larger reductions, may temporarily affect comfort.
    High,

    /// Emergency grid support, maximum flexibility.
    Critical,
}

#[derive(Clone, Debug, Eq, PartialEq, Display, derive_more::Error)]
#[display("demand response duration must be within 5–60 minutes, got {_0}")]
pub struct InvalidDuration(#[error(not(source))] pub u32);

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Builder)]
pub struct DemandResponseRequest {
    pub duration_minutes: u32,

    #[builder(default)]
    pub severity: Severity,

    #[builder(default = vec!["FI".to_string()])]
    pub affected_areas: Vec<String>,
}

impl DemandResponseRequest {
    pub fn validate(&self) -> Result<(), InvalidDuration> {
        if DURATION_MINUTES_RANGE.contains(&self.duration_minutes) {
            Ok(())
        } else {
            Err(InvalidDuration(self.duration_minutes))
        }
    }
}

/// Backend acknowledgement of a triggered event.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DemandResponseAck {
    pub event_id: String,
    pub participants: u32,
    pub estimated_reduction_kw: f64,
}

/// Record of a triggered event.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct DemandResponseEvent {
    pub event_id: String,
    pub severity: Severity,
    pub duration_minutes: u32,
    pub participants: u32,

    /// Kilowatts.
    pub estimated_reduction: f64,
}

impl DemandResponseEvent {
    pub fn new(request: &DemandResponseRequest, ack: DemandResponseAck) -> Self {
        Self {
            event_id: ack.event_id,
            severity: request.severity,
            duration_minutes: request.duration_minutes,
            participants: ack.participants,
            estimated_reduction: ack.estimated_reduction_kw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_bounds() {
        for duration_minutes in [5, 15, 60] {
            assert_eq!(DemandResponseRequest::builder().duration_minutes(duration_minutes).build().validate(), Ok(()));
        }
        for duration_minutes in [0, 4, 61] {
            assert_eq!(
                DemandResponseRequest::builder().duration_minutes(duration_minutes).build().validate(),
                Err(InvalidDuration(duration_minutes)),
            );
        }
    }

    #[test]
    fn test_serialize_request() -> crate::prelude::Result {
        let request = DemandResponseRequest::builder()
            .duration_minutes(15)
            .severity(Severity::Critical)
            .build();
        assert_eq!(
            serde_json::to_value(&request)?,
            serde_json::json!({
                "duration_minutes": 15,
                "severity": "critical",
                "affected_areas": ["FI"],
            }),
        );
        Ok(())
    }
}
