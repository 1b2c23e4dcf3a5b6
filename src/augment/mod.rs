//! Augmentation of the cleaned dataset.
//!
//! [`noise`] and [`scale`] are column-wise transforms that return new
//! datasets; [`generator`] composes them into the named variant set.

pub mod generator;
pub mod noise;
pub mod scale;

pub use generator::{combine, generate_variants, Variant, ORIGINAL_LABEL, SCALE_FACTORS};
pub use noise::{add_percentage_noise, NoiseRange};
pub use scale::multiply_normalized;
