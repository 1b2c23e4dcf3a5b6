use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::data::model::Dataset;
use crate::error::DataError;

/// Bounds of the one-sided multiplicative noise, as fractions (0.01 = 1%).
///
/// Only built through [`NoiseRange::new`] or `Default`, so the bounds are
/// always valid for sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseRange {
    min_percent: f64,
    max_percent: f64,
}

impl Default for NoiseRange {
    fn default() -> Self {
        Self {
            min_percent: 0.01,
            max_percent: 0.06,
        }
    }
}

impl NoiseRange {
    /// Bounds must be finite, non-negative and `min <= max`.
    pub fn new(min_percent: f64, max_percent: f64) -> Result<Self, DataError> {
        let valid = min_percent.is_finite()
            && max_percent.is_finite()
            && min_percent >= 0.0
            && min_percent <= max_percent;
        if !valid {
            return Err(DataError::InvalidNoiseRange {
                min: min_percent,
                max: max_percent,
            });
        }
        Ok(Self {
            min_percent,
            max_percent,
        })
    }

    pub fn min_percent(&self) -> f64 {
        self.min_percent
    }

    pub fn max_percent(&self) -> f64 {
        self.max_percent
    }
}

/// Copy of `data` with each measurement scaled by `1 + r`, where `r` is drawn
/// per row from `Uniform[min_percent, max_percent]` (inclusive).
///
/// The noise only ever increases the magnitude of a value.
pub fn add_percentage_noise<R>(data: &Dataset, range: &NoiseRange, rng: &mut R) -> Dataset
where
    R: Rng + ?Sized,
{
    let dist = Uniform::new_inclusive(range.min_percent, range.max_percent);
    data.map_values(|v| v + v * dist.sample(&mut *rng))
}
