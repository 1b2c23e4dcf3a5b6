use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use super::model::Dataset;

/// Write a dataset as a semicolon-delimited table.
///
/// The table is written to a temporary sibling file and renamed into place,
/// so `path` either holds the complete table or is left as it was.
pub fn write_table(dataset: &Dataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating folder {}", parent.display()))?;
    }

    let tmp_path = temp_path(path);
    if let Err(e) = write_rows(dataset, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    fs::rename(&tmp_path, path)
        .with_context(|| format!("moving {} into place", tmp_path.display()))?;

    info!("Saved {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn write_rows(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let columns = dataset.output_columns();
    writer.write_record(&columns).context("writing header")?;
    for (row_no, row) in dataset.rows.iter().enumerate() {
        writer
            .write_record(columns.iter().map(|c| row.cell(c)))
            .with_context(|| format!("writing row {row_no}"))?;
    }
    writer.flush().context("flushing table")?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Row, PERIOD_COLUMN, USER_CODE_COLUMN, VALUE_COLUMN};
    use std::collections::BTreeMap;

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                USER_CODE_COLUMN.to_string(),
                "Zona".to_string(),
                PERIOD_COLUMN.to_string(),
                VALUE_COLUMN.to_string(),
            ],
            vec![Row {
                user_code: "7".into(),
                period: "2023-01".into(),
                normalized: 2.0,
                is_seasonal: false,
                extra: BTreeMap::from([("Zona".to_string(), "Sur".to_string())]),
            }],
        )
    }

    #[test]
    fn writes_semicolon_table_in_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("processed_data.csv");
        write_table(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Codigo usuario;Zona;Periodo;Normalizado;es_estacional")
        );
        assert_eq!(lines.next(), Some("7;Sur;2023-01;2.0;0"));
        assert!(!dir.path().join("out").join("processed_data.csv.tmp").exists());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let p = temp_path(Path::new("/a/b/data.csv"));
        assert_eq!(p, PathBuf::from("/a/b/data.csv.tmp"));
    }
}
