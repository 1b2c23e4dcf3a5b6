//! Writes a small synthetic consumption table to `data/consumos.csv`.
//!
//! The table mimics the export the pipeline is built for: some measurements
//! carry extra thousands dots, a few are garbage, and one user is all zeros.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MONTHS: usize = 24;

/// (user code, base level, seasonal amplitude)
const USERS: &[(&str, f64, f64)] = &[
    ("101", 1.2, 0.8),
    ("102", 0.9, 0.6),
    ("103", 2.4, 1.5),
    ("201", 1.0, 0.05),
    ("202", 1.7, 0.1),
    ("203", 0.0, 0.0),
    ("999", 1.1, 0.3),
];

fn format_measurement(v: f64, rng: &mut StdRng) -> String {
    let roll: f64 = rng.gen();
    if roll < 0.03 {
        return "s/d".to_string();
    }
    let text = format!("{v:.6}");
    if roll < 0.15 {
        // Re-insert a stray separator into the fractional digits.
        let (int_part, frac) = text.split_at(text.len() - 6);
        return format!("{int_part}{}.{}", &frac[..3], &frac[3..]);
    }
    text
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let output_path = Path::new("data/consumos.csv");
    if let Some(folder) = output_path.parent() {
        fs::create_dir_all(folder).context("creating data folder")?;
    }
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(["Codigo usuario", "Periodo", "Normalizado", "Zona"])?;

    let mut rows = 0;
    for &(code, base, amplitude) in USERS {
        let zone = if code.starts_with('1') { "Costa" } else { "Interior" };
        for m in 0..MONTHS {
            let period = format!("{}-{:02}", 2022 + m / 12, m % 12 + 1);
            let season = (2.0 * PI * m as f64 / 12.0).cos();
            let value = if base == 0.0 {
                0.0
            } else {
                (base + amplitude * season + rng.gen_range(-0.05..0.05)).max(0.0)
            };
            let measurement = format_measurement(value, &mut rng);
            writer.write_record([code, period.as_str(), measurement.as_str(), zone])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows for {} users to {}", USERS.len(), output_path.display());
    Ok(())
}
