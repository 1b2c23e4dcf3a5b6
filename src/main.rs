use std::path::PathBuf;

use anyhow::Result;
use log::info;

use seasonal_augment::app;
use seasonal_augment::config::{Config, DEFAULT_CONFIG_PATH};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = Config::load(&config_path)?;
    config.validate_paths()?;

    let mut rng = config.rng();
    let summary = app::run(&config, &mut rng)?;

    info!(
        "Done: {} cleaned rows, {} variants ({} rows), {} charts",
        summary.cleaned_rows, summary.variants, summary.augmented_rows, summary.charts
    );
    Ok(())
}
