/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv          reference .csv
///        │                               │
///        ▼                               ▼
///   ┌──────────┐                  ┌─────────────┐
///   │  loader   │  parse files →  │  CountryRef  │
///   └──────────┘                  └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Observation> + unique-value indexes
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  country / year-range selections → restricted Series
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
