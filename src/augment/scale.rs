use crate::data::model::Dataset;

/// Copy of `data` with every measurement multiplied by `factor`.
pub fn multiply_normalized(data: &Dataset, factor: f64) -> Dataset {
    data.map_values(|v| v * factor)
}
