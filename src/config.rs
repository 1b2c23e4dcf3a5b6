//! Run configuration, loaded from a JSON file.
//!
//! ```json
//! {
//!   "folder_path": "data",
//!   "file_path": "consumos.csv",
//!   "output_folder": "output",
//!   "positive_codes": [101, "102"],
//!   "negative_codes": [201],
//!   "augmentation_factor": 3
//! }
//! ```
//!
//! `noise_min_percent`, `noise_max_percent` and `seed` are optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Deserializer};

use crate::augment::NoiseRange;
use crate::data::filter::CodeSets;
use crate::data::model::canonical_code;
use crate::error::DataError;

/// Config file used when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Folder holding the input table.
    pub folder_path: String,
    /// Input file name, relative to `folder_path`.
    pub file_path: String,
    pub output_folder: String,
    #[serde(deserialize_with = "deserialize_codes")]
    pub positive_codes: Vec<String>,
    #[serde(deserialize_with = "deserialize_codes")]
    pub negative_codes: Vec<String>,
    /// Number of noisy base variants; must not be negative.
    pub augmentation_factor: i64,
    #[serde(default = "default_noise_min")]
    pub noise_min_percent: f64,
    #[serde(default = "default_noise_max")]
    pub noise_max_percent: f64,
    /// Fixed seed for reproducible noise. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_noise_min() -> f64 {
    NoiseRange::default().min_percent()
}

fn default_noise_max() -> f64 {
    NoiseRange::default().max_percent()
}

/// A code in the JSON file: numbers and strings are both accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn deserialize_codes<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<CodeValue>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|c| match c {
            CodeValue::Integer(i) => i.to_string(),
            CodeValue::Float(f) => canonical_code(&f.to_string()),
            CodeValue::Text(s) => canonical_code(&s),
        })
        .collect())
}

impl Config {
    /// Read and parse the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("config file {} not found or unreadable", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("{} is not a valid config file", path.display()))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("parsing JSON")?;
        config.augmentation_count()?;
        config.noise_range()?;
        Ok(config)
    }

    /// Fail if the input folder is missing; create the output folder if needed.
    pub fn validate_paths(&self) -> Result<()> {
        let folder = Path::new(&self.folder_path);
        if !folder.exists() {
            bail!("folder {} does not exist", folder.display());
        }
        let output = self.output_path();
        if !output.exists() {
            fs::create_dir_all(&output)
                .with_context(|| format!("creating output folder {}", output.display()))?;
            info!("Folder {} has been created", output.display());
        }
        Ok(())
    }

    pub fn input_path(&self) -> PathBuf {
        Path::new(&self.folder_path).join(&self.file_path)
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_folder)
    }

    pub fn code_sets(&self) -> CodeSets {
        CodeSets::new(&self.positive_codes, &self.negative_codes)
    }

    pub fn augmentation_count(&self) -> Result<usize, DataError> {
        usize::try_from(self.augmentation_factor)
            .map_err(|_| DataError::NegativeAugmentationFactor(self.augmentation_factor))
    }

    pub fn noise_range(&self) -> Result<NoiseRange, DataError> {
        NoiseRange::new(self.noise_min_percent, self.noise_max_percent)
    }

    /// Random source for the noise injector.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Seasonality;

    const MINIMAL: &str = r#"{
        "folder_path": "data",
        "file_path": "consumos.csv",
        "output_folder": "out",
        "positive_codes": [101, "0102", 103.0],
        "negative_codes": ["ABC"],
        "augmentation_factor": 2
    }"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = Config::from_json(MINIMAL).unwrap();
        assert_eq!(config.positive_codes, vec!["101", "102", "103"]);
        assert_eq!(config.negative_codes, vec!["ABC"]);
        assert_eq!(config.augmentation_count().unwrap(), 2);
        assert_eq!(config.noise_range().unwrap(), NoiseRange::default());
        assert_eq!(config.seed, None);
        assert_eq!(config.input_path(), PathBuf::from("data/consumos.csv"));
    }

    #[test]
    fn code_sets_follow_config() {
        let codes = Config::from_json(MINIMAL).unwrap().code_sets();
        assert_eq!(codes.classify("102"), Seasonality::Seasonal);
        assert_eq!(codes.classify("ABC"), Seasonality::NonSeasonal);
        assert_eq!(codes.classify("999"), Seasonality::Unresolved);
    }

    #[test]
    fn negative_augmentation_factor_is_rejected() {
        let text = MINIMAL.replace("\"augmentation_factor\": 2", "\"augmentation_factor\": -1");
        let err = Config::from_json(&text).unwrap_err();
        assert!(format!("{err:#}").contains("augmentation_factor"));
    }

    #[test]
    fn inverted_noise_range_is_rejected() {
        let text = MINIMAL.replace(
            "\"augmentation_factor\": 2",
            "\"augmentation_factor\": 2, \"noise_min_percent\": 0.5, \"noise_max_percent\": 0.1",
        );
        assert!(Config::from_json(&text).is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(Config::from_json("{ not json").is_err());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let text = MINIMAL.replace("\"augmentation_factor\": 2", "\"augmentation_factor\": 2, \"seed\": 9");
        let config = Config::from_json(&text).unwrap();
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn validate_paths_creates_output_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::from_json(MINIMAL).unwrap();
        config.folder_path = dir.path().display().to_string();
        config.output_folder = dir.path().join("nested/out").display().to_string();

        config.validate_paths().unwrap();
        assert!(dir.path().join("nested/out").is_dir());

        config.folder_path = dir.path().join("missing").display().to_string();
        assert!(config.validate_paths().is_err());
    }
}
