use log::debug;
use serde::{Deserialize, Serialize};

use crate::{DescentErr, Result, dataset::Sample};

/// Margin added on each side of the observed range so no value lands on its edges.
const MARGIN: f64 = 1.0;

/// A closed interval every value of a dataset is rescaled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxRange {
    min: f64,
    max: f64,
}

impl MinMaxRange {
    /// Creates a new `MinMaxRange`.
    ///
    /// # Returns
    /// An error if `max` is not strictly greater than `min`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(max > min) || !min.is_finite() || !max.is_finite() {
            return Err(DescentErr::DegenerateRange { min, max });
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Maps `v` into `[0, 1]` relative to this range.
    pub fn normalize(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    /// Inverse of [`MinMaxRange::normalize`].
    pub fn denormalize(&self, v: f64) -> f64 {
        v * (self.max - self.min) + self.min
    }
}

/// Computes the range spanning every feature and target of `samples`, widened by one on each
/// side.
///
/// # Returns
/// An error if there are no samples or every value is identical.
pub fn compute_range(samples: &[Sample]) -> Result<MinMaxRange> {
    if samples.is_empty() {
        return Err(DescentErr::EmptyDataset);
    }

    let (min, max) = samples
        .iter()
        .flat_map(Sample::values)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });

    if !(max > min) {
        return Err(DescentErr::DegenerateRange { min, max });
    }

    debug!("observed values between {min} and {max}");
    MinMaxRange::new(min - MARGIN, max + MARGIN)
}

/// Rescales every feature and target of `samples` into `range`.
///
/// # Returns
/// The normalized samples, or an error if the given range has no width.
pub fn normalize(mut samples: Vec<Sample>, range: MinMaxRange) -> Result<Vec<Sample>> {
    let MinMaxRange { min, max } = range;
    if !(max > min) {
        return Err(DescentErr::DegenerateRange { min, max });
    }

    samples
        .iter_mut()
        .for_each(|sample| sample.map_values(|v| range.normalize(v)));

    Ok(samples)
}
