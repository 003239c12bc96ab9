use std::ops::Range;

use average::Mean;

/// Minimum and maximum of a series together with their positions.
///
/// Ties resolve to the first occurrence, so exactly one position carries each label.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extremes {
    pub min: f64,
    pub min_index: usize,
    pub max: f64,
    pub max_index: usize,
}

impl Extremes {
    #[must_use]
    pub const fn is_min(&self, index: usize) -> bool {
        self.min_index == index
    }

    #[must_use]
    pub const fn is_max(&self, index: usize) -> bool {
        self.max_index == index
    }

    #[must_use]
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// Scan the series once. `None` means there is no data, NaNs are skipped.
#[must_use]
pub fn extremes(values: impl IntoIterator<Item = f64>) -> Option<Extremes> {
    let mut values = values.into_iter().enumerate().filter(|(_, value)| !value.is_nan());
    let (index, value) = values.next()?;
    let mut extremes = Extremes { min: value, min_index: index, max: value, max_index: index };
    for (index, value) in values {
        // Strict comparisons keep the first occurrence on ties.
        if value < extremes.min {
            extremes.min = value;
            extremes.min_index = index;
        }
        if value > extremes.max {
            extremes.max = value;
            extremes.max_index = index;
        }
    }
    Some(extremes)
}

/// Arithmetic mean, `None` for an empty series. NaNs are skipped.
#[must_use]
pub fn average(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let estimate: Mean = values.into_iter().filter(|value| !value.is_nan()).collect();
    if estimate.is_empty() { None } else { Some(estimate.mean()) }
}

/// Window of `n_hours` samples starting at the cheapest one.
///
/// The window does not wrap around: it is clamped to the end of the series.
#[must_use]
pub fn best_window(prices: impl IntoIterator<Item = f64>, n_hours: usize) -> Option<Range<usize>> {
    let prices: Vec<f64> = prices.into_iter().collect();
    let start = extremes(prices.iter().copied())?.min_index;
    Some(start..(start.saturating_add(n_hours)).min(prices.len()))
}
