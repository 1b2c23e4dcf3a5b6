//! Cleaning and augmentation of per-user consumption series.
//!
//! The raw table is repaired and labelled as seasonal or not
//! ([`data::clean`]), then expanded into noisy and rescaled variants
//! ([`augment`]). [`app::run`] wires that to CSV files and PNG charts.

pub mod app;
pub mod augment;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;

pub use error::DataError;
