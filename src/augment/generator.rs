use log::info;
use rand::Rng;

use super::noise::{add_percentage_noise, NoiseRange};
use super::scale::multiply_normalized;
use crate::data::model::Dataset;

/// Label under which the cleaned dataset itself is charted.
pub const ORIGINAL_LABEL: &str = "original";

/// Fixed scale factors and the suffix each one contributes to a label.
pub const SCALE_FACTORS: [(f64, &str); 3] = [(0.5, "0.5"), (1.5, "1.5"), (2.5, "2.5")];

/// One named, fully materialised copy of the cleaned dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub label: String,
    pub dataset: Dataset,
}

impl Variant {
    fn new(label: String, dataset: Dataset) -> Self {
        Self { label, dataset }
    }
}

/// Build the augmented variants of `data`, in this order:
///
/// ```text
/// for i in 1..=N:
///     modificacion_<i>                     one noisy draw
///     modificacion_<i>_multiplicado_<s>    that same draw scaled, per factor
/// original_multiplicado_<s>                data scaled, per factor
/// ```
///
/// That is `4 * N + 3` variants with unique labels.
pub fn generate_variants<R>(
    data: &Dataset,
    augmentation_factor: usize,
    noise: &NoiseRange,
    rng: &mut R,
) -> Vec<Variant>
where
    R: Rng + ?Sized,
{
    let mut variants = Vec::with_capacity(4 * augmentation_factor + SCALE_FACTORS.len());

    for i in 1..=augmentation_factor {
        let noisy = add_percentage_noise(data, noise, rng);
        let base_label = format!("modificacion_{i}");

        let scaled: Vec<Variant> = SCALE_FACTORS
            .iter()
            .map(|&(factor, suffix)| {
                Variant::new(
                    format!("{base_label}_multiplicado_{suffix}"),
                    multiply_normalized(&noisy, factor),
                )
            })
            .collect();
        variants.push(Variant::new(base_label, noisy));
        variants.extend(scaled);
    }

    for (factor, suffix) in SCALE_FACTORS {
        variants.push(Variant::new(
            format!("{ORIGINAL_LABEL}_multiplicado_{suffix}"),
            multiply_normalized(data, factor),
        ));
    }

    info!(
        "Generated {} variants (augmentation_factor = {augmentation_factor})",
        variants.len()
    );
    variants
}

/// Concatenate all variant tables, in order, into one dataset.
pub fn combine(variants: &[Variant]) -> Option<Dataset> {
    let columns = variants.first()?.dataset.columns.clone();
    let rows = variants
        .iter()
        .flat_map(|v| v.dataset.rows.iter().cloned())
        .collect();
    Some(Dataset::new(columns, rows))
}
