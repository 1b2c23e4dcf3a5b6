use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::model::RawDataset;

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load the raw consumption table.
///
/// CSV layout: comma-delimited with a header row. The columns
/// `Codigo usuario`, `Periodo` and `Normalizado` are required; all other
/// columns are carried through to the outputs untouched.
pub fn load_csv(path: &Path) -> Result<RawDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    let dataset = RawDataset::from_table(headers, rows)
        .with_context(|| format!("validating {}", path.display()))?;
    info!("Data loaded from {} ({} rows)", path.display(), dataset.len());
    Ok(dataset)
}
