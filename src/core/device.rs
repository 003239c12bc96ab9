use std::ops::RangeInclusive;

use bon::Builder;
use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Supported region, roughly Finland.
pub const LATITUDE_RANGE: RangeInclusive<f64> = 59.0..=71.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = 19.0..=32.0;

pub const FLOOR_AREA_RANGE: RangeInclusive<f64> = 1.0..=500.0;
pub const VOLUME_RANGE: RangeInclusive<f64> = 1.0..=1500.0;
pub const RATED_POWER_RANGE: RangeInclusive<f64> = 1.0..=50.0;
pub const COP_RANGE: RangeInclusive<f64> = 2.0..=5.0;
pub const COMFORT_MIN_RANGE: RangeInclusive<f64> = 15.0..=20.0;
pub const COMFORT_MAX_RANGE: RangeInclusive<f64> = 20.0..=26.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InsulationLevel {
    #[serde(alias = "low")]
    Poor,

    #[serde(alias = "medium")]
    Average,

    #[serde(alias = "high")]
    Good,

    Excellent,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HeatPumpType {
    #[serde(alias = "ASHP")]
    AirSource,

    #[serde(alias = "GSHP")]
    GroundSource,

    WaterSource,

    Hybrid,
}

impl HeatPumpType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AirSource => "air source",
            Self::GroundSource => "ground source",
            Self::WaterSource => "water source",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Writable part of a device, as submitted for registration.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Builder)]
pub struct DeviceRegistration {
    #[builder(into)]
    pub device_id: String,

    #[builder(into)]
    pub name: String,

    pub latitude: f64,
    pub longitude: f64,
    pub insulation_level: InsulationLevel,

    /// Square metres.
    pub floor_area: f64,

    /// Cubic metres.
    pub volume: f64,

    pub heat_pump_type: HeatPumpType,

    /// Kilowatts.
    pub rated_power: f64,

    #[builder(default = 3.5)]
    pub cop_rating: f64,

    #[builder(default = 18.0)]
    pub comfort_min_temp: f64,

    #[builder(default = 24.0)]
    pub comfort_max_temp: f64,

    /// Participation in the virtual power plant.
    #[builder(default)]
    pub vpp_enabled: bool,
}

impl DeviceRegistration {
    /// Check every field and report all offending ones at once.
    pub fn validate(&self) -> Result<(), InvalidRegistration> {
        let mut errors = Vec::new();

        let id_length = self.device_id.trim().chars().count();
        if id_length == 0 {
            errors.push(FieldError::new("device_id", "device ID is required"));
        } else if id_length > 50 {
            errors.push(FieldError::new("device_id", "device ID must be at most 50 characters"));
        }

        let name_length = self.name.trim().chars().count();
        if name_length == 0 {
            errors.push(FieldError::new("name", "name is required"));
        } else if name_length > 100 {
            errors.push(FieldError::new("name", "name must be at most 100 characters"));
        }

        let checks = [
            ("latitude", self.latitude, LATITUDE_RANGE, "latitude must be within 59–71°N"),
            ("longitude", self.longitude, LONGITUDE_RANGE, "longitude must be within 19–32°E"),
            ("floor_area", self.floor_area, FLOOR_AREA_RANGE, "floor area must be 1–500 m²"),
            ("volume", self.volume, VOLUME_RANGE, "volume must be 1–1500 m³"),
            ("rated_power", self.rated_power, RATED_POWER_RANGE, "rated power must be 1–50 kW"),
            ("cop_rating", self.cop_rating, COP_RANGE, "COP rating must be 2.0–5.0"),
            (
                "comfort_min_temp",
                self.comfort_min_temp,
                COMFORT_MIN_RANGE,
                "minimal comfort temperature must be 15–20 °C",
            ),
            (
                "comfort_max_temp",
                self.comfort_max_temp,
                COMFORT_MAX_RANGE,
                "maximal comfort temperature must be 20–26 °C",
            ),
        ];
        for (field, value, range, message) in checks {
            // `contains` is false for NaN, which is what we want here.
            if !range.contains(&value) {
                errors.push(FieldError::new(field, message));
            }
        }

        if self.comfort_max_temp <= self.comfort_min_temp {
            errors.push(FieldError::new(
                "comfort_max_temp",
                "maximal temperature must be greater than the minimal one",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(InvalidRegistration(errors)) }
    }
}

/// Registered device as returned by the backend.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Deref)]
pub struct Device {
    /// Backend-assigned identifier; the user-facing one is `device_id`.
    pub id: u64,

    #[deref]
    #[serde(flatten)]
    pub registration: DeviceRegistration,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Stand-in for a device the backend could not return.
    ///
    /// Carries the requested ID and otherwise typical values, never participating in the grid.
    pub fn placeholder(device_id: impl Into<String>) -> Self {
        Self {
            id: 0,
            registration: DeviceRegistration::builder()
                .device_id(device_id)
                .name("Unavailable")
                .latitude(60.1699)
                .longitude(24.9384)
                .insulation_level(InsulationLevel::Average)
                .floor_area(45.0)
                .volume(120.0)
                .heat_pump_type(HeatPumpType::AirSource)
                .rated_power(8.0)
                .build(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Display)]
#[display("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Display, derive_more::Error)]
#[display("invalid registration: {}", _0.iter().join("; "))]
pub struct InvalidRegistration(#[error(not(source))] pub Vec<FieldError>);

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::prelude::*;

    pub fn living_room() -> DeviceRegistration {
        DeviceRegistration::builder()
            .device_id("HP-001")
            .name("Living Room")
            .latitude(60.1699)
            .longitude(24.9384)
            .insulation_level(InsulationLevel::Good)
            .floor_area(45.0)
            .volume(120.0)
            .heat_pump_type(HeatPumpType::AirSource)
            .rated_power(8.0)
            .vpp_enabled(true)
            .build()
    }

    #[test]
    fn test_valid_registration() {
        assert_eq!(living_room().validate(), Ok(()));
    }

    #[test]
    fn test_builder_defaults() {
        let registration = living_room();
        assert_eq!(registration.cop_rating, 3.5);
        assert_eq!(registration.comfort_min_temp, 18.0);
        assert_eq!(registration.comfort_max_temp, 24.0);
    }

    #[test]
    fn test_all_offending_fields_reported() {
        let registration = DeviceRegistration {
            device_id: "  ".into(),
            latitude: 52.37,
            longitude: f64::NAN,
            cop_rating: 6.0,
            comfort_min_temp: 20.0,
            comfort_max_temp: 20.0,
            ..living_room()
        };
        let error = registration.validate().unwrap_err();
        assert_eq!(
            error.0.iter().map(|error| error.field).collect_vec(),
            ["device_id", "latitude", "longitude", "cop_rating", "comfort_max_temp"],
        );
    }

    #[test]
    fn test_invalid_registration_display() {
        let registration = DeviceRegistration { cop_rating: 6.0, ..living_room() };
        let message = registration.validate().unwrap_err().to_string();
        assert!(message.starts_with("invalid registration: cop_rating"), "{message}");
    }

    #[test]
    fn test_placeholder() {
        let device = Device::placeholder("HP-042");
        assert_eq!(device.id, 0);
        assert_eq!(device.device_id, "HP-042");
        assert!(!device.vpp_enabled);
        assert_eq!(device, Device::placeholder("HP-042"));
    }

    #[test]
    fn test_deserialize_device_ok() -> Result {
        // language=json
        const BODY: &str = r#"{
            "id": 1,
            "device_id": "HP-001",
            "name": "Living Room",
            "latitude": 60.1699,
            "longitude": 24.9384,
            "insulation_level": "high",
            "floor_area": 45,
            "volume": 120,
            "heat_pump_type": "GSHP",
            "rated_power": 8,
            "cop_rating": 3.5,
            "comfort_min_temp": 18,
            "comfort_max_temp": 24,
            "vpp_enabled": true,
            "created_at": "2024-01-15T10:00:00Z",
            "updated_at": "2024-01-15T10:00:00Z"
        }"#;
        let device: Device = serde_json::from_str(BODY)?;
        assert_eq!(device.id, 1);
        assert_eq!(device.device_id, "HP-001");
        assert_eq!(device.insulation_level, InsulationLevel::Good);
        assert_eq!(device.heat_pump_type, HeatPumpType::GroundSource);
        assert!(device.vpp_enabled);
        Ok(())
    }
}
