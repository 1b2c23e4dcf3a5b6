use log::{debug, info};

use super::filter::{filtered_indices, CodeSets, LabeledRow};
use super::model::{Dataset, RawDataset, Row};
use super::repair::repair_decimal;

/// Turn the raw table into the cleaned dataset.
///
/// Steps, in order: decimal repair of every measurement, linear interpolation
/// of the gaps, seasonal labelling, removal of all-zero users, removal of rows
/// with an unresolved label or a measurement that is still missing.
///
/// Interpolation runs over the whole table in row order, not per user, so a
/// gap at a user boundary is filled from the neighbouring user's values.
pub fn clean(raw: &RawDataset, codes: &CodeSets) -> Dataset {
    let mut values: Vec<Option<f64>> = raw.records.iter().map(|r| repair_decimal(&r.value)).collect();

    let missing = values.iter().filter(|v| v.is_none()).count();
    info!("Total missing 'Normalizado' values after conversion: {missing}");

    interpolate_linear(&mut values);

    let labeled: Vec<LabeledRow<'_>> = raw
        .records
        .iter()
        .zip(&values)
        .map(|(rec, value)| LabeledRow {
            user_code: rec.user_code.as_str(),
            value: *value,
            label: codes.classify(&rec.user_code),
        })
        .collect();

    let keep = filtered_indices(&labeled);
    debug!("Cleaning kept {} of {} rows", keep.len(), raw.len());

    let rows = keep
        .into_iter()
        .filter_map(|i| {
            let rec = &raw.records[i];
            Some(Row {
                user_code: rec.user_code.clone(),
                period: rec.period.clone(),
                normalized: values[i]?,
                is_seasonal: labeled[i].label.resolved()?,
                extra: rec.extra.clone(),
            })
        })
        .collect();

    Dataset::new(raw.columns.clone(), rows)
}

/// Fill gaps by linear interpolation on row position.
///
/// Gaps between two known values are filled linearly, trailing gaps repeat the
/// last known value, leading gaps stay `None`.
pub fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut last_known: Option<(usize, f64)> = None;

    for i in 0..values.len() {
        let Some(current) = values[i] else {
            continue;
        };
        if let Some((j, prev)) = last_known {
            let span = (i - j) as f64;
            for k in (j + 1)..i {
                let t = (k - j) as f64 / span;
                values[k] = Some(prev + (current - prev) * t);
            }
        }
        last_known = Some((i, current));
    }

    if let Some((j, prev)) = last_known {
        for slot in &mut values[j + 1..] {
            *slot = Some(prev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{PERIOD_COLUMN, USER_CODE_COLUMN, VALUE_COLUMN};

    fn raw(rows: &[(&str, &str, &str)]) -> RawDataset {
        let columns = vec![
            USER_CODE_COLUMN.to_string(),
            PERIOD_COLUMN.to_string(),
            VALUE_COLUMN.to_string(),
        ];
        let rows = rows
            .iter()
            .map(|(u, p, v)| vec![u.to_string(), p.to_string(), v.to_string()])
            .collect();
        RawDataset::from_table(columns, rows).unwrap()
    }

    #[test]
    fn interpolates_interior_gap() {
        let mut v = vec![Some(1.0), None, None, Some(4.0)];
        interpolate_linear(&mut v);
        assert_eq!(v, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn trailing_gap_repeats_last_and_leading_gap_stays() {
        let mut v = vec![None, Some(2.0), None];
        interpolate_linear(&mut v);
        assert_eq!(v, vec![None, Some(2.0), Some(2.0)]);
    }

    #[test]
    fn interpolation_of_all_missing_is_noop() {
        let mut v: Vec<Option<f64>> = vec![None, None];
        interpolate_linear(&mut v);
        assert_eq!(v, vec![None, None]);
    }

    #[test]
    fn drops_all_zero_users() {
        let data = raw(&[
            ("U1", "2023-01", "0"),
            ("U1", "2023-02", "0"),
            ("U1", "2023-03", "0"),
            ("U2", "2023-01", "0"),
            ("U2", "2023-02", "5"),
            ("U2", "2023-03", "0"),
        ]);
        let codes = CodeSets::new(["U1", "U2"], Vec::<String>::new());
        let cleaned = clean(&data, &codes);
        assert_eq!(cleaned.len(), 3);
        assert!(cleaned.rows.iter().all(|r| r.user_code == "U2"));
    }

    #[test]
    fn labels_and_drops_unknown_codes() {
        let data = raw(&[
            ("10", "2023-01", "1.5"),
            ("20", "2023-01", "2.5"),
            ("30", "2023-01", "3.5"),
        ]);
        let codes = CodeSets::new(["10"], ["20"]);
        let cleaned = clean(&data, &codes);
        assert_eq!(cleaned.len(), 2);
        assert!(cleaned.rows[0].is_seasonal);
        assert!(!cleaned.rows[1].is_seasonal);
    }

    #[test]
    fn repairs_and_interpolates_across_users() {
        let data = raw(&[
            ("A", "2023-01", "1.000.0"),
            ("A", "2023-02", "abc"),
            ("B", "2023-01", "3"),
        ]);
        let codes = CodeSets::new(["A", "B"], Vec::<String>::new());
        let cleaned = clean(&data, &codes);
        let values: Vec<f64> = cleaned.rows.iter().map(|r| r.normalized).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn leading_gap_row_is_dropped() {
        let data = raw(&[("A", "2023-01", "x"), ("A", "2023-02", "4")]);
        let codes = CodeSets::new(["A"], Vec::<String>::new());
        let cleaned = clean(&data, &codes);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.rows[0].period, "2023-02");
    }

    #[test]
    fn source_dataset_is_not_modified() {
        let data = raw(&[("A", "2023-01", "1.2.3")]);
        let before = data.clone();
        let _ = clean(&data, &CodeSets::new(["A"], Vec::<String>::new()));
        assert_eq!(data, before);
    }
}
