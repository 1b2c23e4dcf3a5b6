use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: variant label → series colour
// ---------------------------------------------------------------------------

/// Series families, one colour each.
const FAMILIES: [&str; 5] = ["original", "modificacion", "0.5", "1.5", "2.5"];

/// Colours chart lines by the family of their variant label, so every
/// `*_multiplicado_1.5` chart shares a colour regardless of its noise draw.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<&'static str, RGBColor>,
    default_color: RGBColor,
}

impl Default for ColorMap {
    fn default() -> Self {
        let mapping = FAMILIES
            .iter()
            .copied()
            .zip(generate_palette(FAMILIES.len()))
            .collect();
        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }
}

impl ColorMap {
    /// Look up the line colour for a variant label.
    pub fn color_for(&self, label: &str) -> RGBColor {
        self.mapping
            .get(family_of(label))
            .copied()
            .unwrap_or(self.default_color)
    }
}

fn family_of(label: &str) -> &str {
    if let Some((_, suffix)) = label.rsplit_once("_multiplicado_") {
        return suffix;
    }
    if label.starts_with("modificacion") {
        "modificacion"
    } else {
        label
    }
}
