use anyhow::{Context, Result};
use log::info;
use rand::Rng;

use crate::augment::{combine, generate_variants, ORIGINAL_LABEL};
use crate::chart::save_user_charts;
use crate::color::ColorMap;
use crate::config::Config;
use crate::data::clean::clean;
use crate::data::loader::load_csv;
use crate::data::writer::write_table;

/// Cleaned table written by [`run`].
pub const PROCESSED_FILE: &str = "processed_data.csv";
/// Combined variant table written by [`run`].
pub const AUGMENTED_FILE: &str = "augmented_data.csv";

// ---------------------------------------------------------------------------
// Batch run
// ---------------------------------------------------------------------------

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub cleaned_rows: usize,
    pub variants: usize,
    pub augmented_rows: usize,
    pub charts: usize,
}

/// Load, clean, augment, persist and chart, as configured.
///
/// Paths are not validated here; call [`Config::validate_paths`] first.
pub fn run<R>(config: &Config, rng: &mut R) -> Result<RunSummary>
where
    R: Rng + ?Sized,
{
    let augmentation_factor = config.augmentation_count()?;
    let noise = config.noise_range()?;
    let output = config.output_path();

    let raw = load_csv(&config.input_path())?;
    let cleaned = clean(&raw, &config.code_sets());
    write_table(&cleaned, &output.join(PROCESSED_FILE)).context("saving processed data")?;
    info!("Processed data: {} rows", cleaned.len());

    let variants = generate_variants(&cleaned, augmentation_factor, &noise, rng);
    let augmented_rows = match combine(&variants) {
        Some(combined) => {
            write_table(&combined, &output.join(AUGMENTED_FILE))
                .context("saving augmented data")?;
            combined.len()
        }
        None => 0,
    };

    let colors = ColorMap::default();
    let mut charts = save_user_charts(&cleaned, &output, ORIGINAL_LABEL, &colors)?;
    for variant in &variants {
        charts += save_user_charts(&variant.dataset, &output, &variant.label, &colors)?;
    }
    info!("Saved {charts} charts under {}", output.display());

    Ok(RunSummary {
        cleaned_rows: cleaned.len(),
        variants: variants.len(),
        augmented_rows,
        charts,
    })
}
