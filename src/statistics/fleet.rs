use crate::core::Device;

/// Count of devices participating in the virtual power plant.
#[must_use]
pub fn participation_count<'a>(devices: impl IntoIterator<Item = &'a Device>) -> usize {
    devices.into_iter().filter(|device| device.vpp_enabled).count()
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FleetSummary {
    pub n_devices: usize,
    pub n_participating: usize,

    /// Rated power of the participating devices, kilowatts.
    pub participating_capacity: f64,
}

impl FleetSummary {
    pub fn new(devices: &[Device]) -> Self {
        Self {
            n_devices: devices.len(),
            n_participating: participation_count(devices),
            participating_capacity: devices
                .iter()
                .filter(|device| device.vpp_enabled)
                .map(|device| device.rated_power)
                .sum(),
        }
    }
}
