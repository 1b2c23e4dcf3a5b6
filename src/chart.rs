//! Per-user line charts of a dataset, one PNG per user and label.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use plotters::prelude::*;

use crate::color::ColorMap;
use crate::data::model::{Dataset, Row, PERIOD_COLUMN, VALUE_COLUMN};

const SIZE: (u32, u32) = (1500, 1000);
const FONT: &str = "sans-serif";

// ---------------------------------------------------------------------------
// Chart content
// ---------------------------------------------------------------------------

/// Everything drawn on one user's chart, independent of the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct UserChart {
    pub user_code: String,
    pub label: String,
    /// X tick labels, in plotting order.
    pub periods: Vec<String>,
    pub values: Vec<f64>,
}

impl UserChart {
    /// Build from one user's rows, already ordered by period.
    pub fn new(user_code: &str, label: &str, series: &[&Row]) -> Self {
        UserChart {
            user_code: user_code.to_string(),
            label: label.to_string(),
            periods: series.iter().map(|r| r.period.clone()).collect(),
            values: series.iter().map(|r| r.normalized).collect(),
        }
    }

    pub fn title(&self) -> String {
        format!("{VALUE_COLUMN} del usuario {} ({})", self.user_code, self.label)
    }

    pub fn legend(&self) -> String {
        format!("{VALUE_COLUMN} ({})", self.label)
    }

    /// Upper bound of the y axis: 110% of the largest value.
    pub fn y_max(&self) -> f64 {
        let max = self
            .values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    /// Tick label for x position `index`; empty between or outside periods.
    pub fn period_label(&self, index: i32) -> String {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.periods.get(i))
            .cloned()
            .unwrap_or_default()
    }

    fn points(&self) -> Vec<(i32, f64)> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| (i as i32, v))
            .collect()
    }

    /// Draw the chart as a PNG at `path`.
    pub fn render(&self, path: &Path, color: RGBColor) -> Result<()> {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let x_end = (self.periods.len() as i32 - 1).max(1);
        let mut chart = ChartBuilder::on(&root)
            .caption(self.title(), (FONT, 30))
            .margin(20)
            .x_label_area_size(120)
            .y_label_area_size(70)
            .build_cartesian_2d(0..x_end, 0f64..self.y_max())?;

        let tick_label = |x: &i32| self.period_label(*x);
        chart
            .configure_mesh()
            .x_labels(self.periods.len().max(2))
            .x_label_formatter(&tick_label)
            .x_label_style(
                (FONT, 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(PERIOD_COLUMN)
            .y_desc(VALUE_COLUMN)
            .draw()?;

        let points = self.points();
        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(self.legend())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart.draw_series(points.iter().map(|&(x, y)| {
            EmptyElement::at((x, y))
                + Circle::new((0, 0), 5, color.filled())
                + Text::new(format!("{y:.2}"), (-14, -24), (FONT, 14).into_font())
        }))?;

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()
            .with_context(|| format!("writing chart {}", path.display()))?;
        Ok(())
    }
}

/// One chart per user of `dataset`, users in code order.
pub fn user_charts(dataset: &Dataset, label: &str) -> Vec<UserChart> {
    dataset
        .by_user()
        .into_iter()
        .map(|(user, series)| UserChart::new(user, label, &series))
        .collect()
}

// ---------------------------------------------------------------------------
// Chart output
// ---------------------------------------------------------------------------

/// Render one chart per user of `dataset` into `output_folder/user_<code>/`,
/// named `user_<code>_<label>.png`. Returns the number of charts written.
pub fn save_user_charts(
    dataset: &Dataset,
    output_folder: &Path,
    label: &str,
    colors: &ColorMap,
) -> Result<usize> {
    let color = colors.color_for(label);
    let mut written = 0;

    for chart in user_charts(dataset, label) {
        let path = chart_path(output_folder, &chart.user_code, label);
        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder)
                .with_context(|| format!("creating folder {}", folder.display()))?;
        }
        chart
            .render(&path, color)
            .with_context(|| format!("saving chart {}", path.display()))?;
        written += 1;
    }

    debug!("Saved {written} charts for '{label}'");
    Ok(written)
}

/// `output_folder/user_<code>/user_<code>_<label>.png`
pub fn chart_path(output_folder: &Path, user_code: &str, label: &str) -> PathBuf {
    let user = sanitize(user_code);
    output_folder
        .join(format!("user_{user}"))
        .join(format!("user_{user}_{label}.png"))
}

fn sanitize(code: &str) -> String {
    code.chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn dataset(rows: &[(&str, &str, f64)]) -> Dataset {
        let rows = rows
            .iter()
            .map(|&(u, p, v)| Row {
                user_code: u.to_string(),
                period: p.to_string(),
                normalized: v,
                is_seasonal: true,
                extra: BTreeMap::new(),
            })
            .collect();
        Dataset::new(Vec::new(), rows)
    }

    #[test]
    fn charts_get_sorted_period_labels() {
        let data = dataset(&[
            ("A", "2023-03", 3.0),
            ("B", "2023-01", 1.0),
            ("A", "2023-01", 1.0),
            ("A", "2023-02", 2.0),
        ]);
        let charts = user_charts(&data, "modificacion_1");
        assert_eq!(charts.len(), 2);

        let a = &charts[0];
        assert_eq!(a.user_code, "A");
        assert_eq!(a.periods, vec!["2023-01", "2023-02", "2023-03"]);
        assert_eq!(a.values, vec![1.0, 2.0, 3.0]);
        assert_eq!(a.period_label(0), "2023-01");
        assert_eq!(a.period_label(2), "2023-03");
        assert_eq!(a.period_label(3), "");
        assert_eq!(a.period_label(-1), "");
        assert_eq!(charts[1].periods, vec!["2023-01"]);
    }

    #[test]
    fn chart_text() {
        let data = dataset(&[("7", "2023-01", 2.0)]);
        let chart = &user_charts(&data, "original")[0];
        assert_eq!(chart.title(), "Normalizado del usuario 7 (original)");
        assert_eq!(chart.legend(), "Normalizado (original)");
    }

    #[test]
    fn y_axis_headroom() {
        let chart = &user_charts(&dataset(&[("A", "p1", 1.0), ("A", "p2", 3.0)]), "x")[0];
        assert!((chart.y_max() - 3.3).abs() < 1e-12);
        let flat = &user_charts(&dataset(&[("A", "p1", 0.0)]), "x")[0];
        assert_eq!(flat.y_max(), 1.0);
    }

    #[test]
    fn chart_path_layout() {
        let p = chart_path(Path::new("out"), "12/3", "modificacion_1");
        assert_eq!(p, PathBuf::from("out/user_12_3/user_12_3_modificacion_1.png"));
    }

    #[test]
    fn writes_one_png_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let data = dataset(&[("A", "2023-02", 2.0), ("B", "2023-01", 1.0), ("A", "2023-01", 1.0)]);

        let n = save_user_charts(&data, dir.path(), "original", &ColorMap::default()).unwrap();
        assert_eq!(n, 2);

        let png = dir.path().join("user_A/user_A_original.png");
        let img = image::open(&png).unwrap();
        assert_eq!((img.width(), img.height()), SIZE);
        assert!(dir.path().join("user_B/user_B_original.png").is_file());
    }
}
