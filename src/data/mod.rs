/// Data layer: core types, loading, cleaning and persistence.
///
/// Architecture:
/// ```text
///  input .csv (comma)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  repair decimals, interpolate, label,
///   └──────────┘  filter (see `repair`, `filter`)
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  cleaned rows, immutable from here on
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  semicolon table, written atomically
///   └──────────┘
/// ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod repair;
pub mod writer;
