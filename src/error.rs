use thiserror::Error;

/// Structural problems with the data or parameters handed to the core.
///
/// Recoverable issues (unparseable cells, all-zero users, unknown codes) never
/// surface here: they are absorbed by dropping the affected rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("invalid input: missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid input: row {row} has {found} cells, header has {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("augmentation_factor must be >= 0, got {0}")]
    NegativeAugmentationFactor(i64),

    #[error("invalid noise range [{min}, {max}]: bounds must be finite, non-negative and ordered")]
    InvalidNoiseRange { min: f64, max: f64 },
}
