use std::borrow::Cow;

use log::warn;

use super::model::CellValue;

/// Repair a measurement cell whose decimal separator may be mixed with
/// thousands separators.
///
/// Numbers pass through unchanged. For text, the first `.` is kept as the
/// decimal point and every later `.` is dropped, so `"1.234.567"` becomes
/// `1.234567`. This is a heuristic for one export format: a value that really
/// used `.` for thousands (`"1.234.567"` meaning 1234567) is read wrong.
///
/// Returns `None` when the result still does not parse; the caller treats it
/// as a gap to be interpolated.
pub fn repair_decimal(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(v) if v.is_nan() => None,
        CellValue::Number(v) => Some(*v),
        CellValue::Missing => None,
        CellValue::Text(text) => {
            let candidate = collapse_separators(text.trim());
            match candidate.parse::<f64>() {
                Ok(v) if v.is_nan() => None,
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Error converting '{candidate}' to a number");
                    None
                }
            }
        }
    }
}

/// Keep the first `.` and remove the rest.
fn collapse_separators(s: &str) -> Cow<'_, str> {
    match s.split_once('.') {
        Some((int_part, frac)) if frac.contains('.') => {
            Cow::Owned(format!("{int_part}.{}", frac.replace('.', "")))
        }
        _ => Cow::Borrowed(s),
    }
}
