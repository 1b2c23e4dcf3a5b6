use std::collections::BTreeMap;

use crate::error::DataError;

/// Column holding the categorical user identifier.
pub const USER_CODE_COLUMN: &str = "Codigo usuario";
/// Column holding the period of each measurement.
pub const PERIOD_COLUMN: &str = "Periodo";
/// Column holding the normalized measurement.
pub const VALUE_COLUMN: &str = "Normalizado";
/// Derived seasonality flag, appended to every output table.
pub const SEASONAL_COLUMN: &str = "es_estacional";

/// Tokens the CSV reader treats as an absent cell.
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// CellValue – raw content of a measurement cell
// ---------------------------------------------------------------------------

/// A measurement cell as read from disk, before decimal repair.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    /// Text that did not parse as a float, e.g. `"1.234.5"`.
    Text(String),
    Missing,
}

impl CellValue {
    /// Type a raw CSV cell: null tokens are missing, valid floats are numbers,
    /// anything else stays text for the decimal repair step.
    pub fn guess(s: &str) -> Self {
        let trimmed = s.trim();
        if NULL_TOKENS.contains(&trimmed) {
            return CellValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => CellValue::Missing,
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::Text(s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Seasonality – tri-state label
// ---------------------------------------------------------------------------

/// Seasonal label assigned from the configured code sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seasonality {
    Seasonal,
    NonSeasonal,
    /// The code is in neither set; such rows never survive cleaning.
    Unresolved,
}

impl Seasonality {
    /// `Some(true)` for seasonal, `Some(false)` for non-seasonal.
    pub fn resolved(self) -> Option<bool> {
        match self {
            Seasonality::Seasonal => Some(true),
            Seasonality::NonSeasonal => Some(false),
            Seasonality::Unresolved => None,
        }
    }
}

/// Canonical text form of a user code.
///
/// Integral numbers lose leading zeros and any `.0` suffix so that `"0123"`,
/// `"123.0"` and a JSON `123` all name the same user.
pub fn canonical_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return i.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        _ => trimmed.to_string(),
    }
}

// ---------------------------------------------------------------------------
// RawDataset – the table as read, before cleaning
// ---------------------------------------------------------------------------

/// One input row with its measurement still unrepaired.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub user_code: String,
    pub period: String,
    pub value: CellValue,
    /// Pass-through columns: column_name → cell text.
    pub extra: BTreeMap<String, String>,
}

/// The loaded input table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    /// Input column order, used again when writing outputs.
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawDataset {
    /// Build a raw dataset from a header and string rows, checking that the
    /// required columns are present and that every row matches the header.
    pub fn from_table(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DataError> {
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        let user_idx = position(USER_CODE_COLUMN)?;
        let period_idx = position(PERIOD_COLUMN)?;
        let value_idx = position(VALUE_COLUMN)?;

        let mut records = Vec::with_capacity(rows.len());
        for (row_no, cells) in rows.into_iter().enumerate() {
            if cells.len() != columns.len() {
                return Err(DataError::RowWidth {
                    row: row_no,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }

            let mut extra = BTreeMap::new();
            for (idx, cell) in cells.iter().enumerate() {
                if idx == user_idx || idx == period_idx || idx == value_idx {
                    continue;
                }
                // Recomputed during cleaning, never carried over.
                if columns[idx] == SEASONAL_COLUMN {
                    continue;
                }
                extra.insert(columns[idx].clone(), cell.clone());
            }

            records.push(RawRecord {
                user_code: canonical_code(&cells[user_idx]),
                period: cells[period_idx].clone(),
                value: CellValue::guess(&cells[value_idx]),
                extra,
            });
        }

        Ok(RawDataset { columns, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dataset – cleaned rows
// ---------------------------------------------------------------------------

/// A cleaned row: measurement present, seasonality resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub user_code: String,
    pub period: String,
    pub normalized: f64,
    pub is_seasonal: bool,
    pub extra: BTreeMap<String, String>,
}

impl Row {
    /// Text of `column` for this row as it is written to disk.
    pub fn cell(&self, column: &str) -> String {
        match column {
            USER_CODE_COLUMN => self.user_code.clone(),
            PERIOD_COLUMN => self.period.clone(),
            VALUE_COLUMN => format_value(self.normalized),
            SEASONAL_COLUMN => u8::from(self.is_seasonal).to_string(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }
}

/// Float formatting for output tables, matching Python's `repr`: integral
/// values keep a `.0` and exponents carry a sign and at least two digits
/// (`1.234e-05`, `1e+16`).
pub fn format_value(v: f64) -> String {
    let text = format!("{v:?}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

/// A cleaned table. Transforms return new datasets and never touch `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Input column order (without the seasonality flag).
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Dataset { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns written to disk: the input order plus the seasonality flag.
    pub fn output_columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.as_str() != SEASONAL_COLUMN)
            .cloned()
            .collect();
        cols.push(SEASONAL_COLUMN.to_string());
        cols
    }

    /// Rows grouped by user code, each group ordered by period as text.
    pub fn by_user(&self) -> BTreeMap<&str, Vec<&Row>> {
        let mut groups: BTreeMap<&str, Vec<&Row>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(row.user_code.as_str()).or_default().push(row);
        }
        for rows in groups.values_mut() {
            rows.sort_by(|a, b| a.period.cmp(&b.period));
        }
        groups
    }

    /// Copy of the dataset with every measurement passed through `f`.
    pub fn map_values<F>(&self, mut f: F) -> Dataset
    where
        F: FnMut(f64) -> f64,
    {
        let rows = self
            .rows
            .iter()
            .map(|r| Row {
                normalized: f(r.normalized),
                ..r.clone()
            })
            .collect();
        Dataset {
            columns: self.columns.clone(),
            rows,
        }
    }
}
