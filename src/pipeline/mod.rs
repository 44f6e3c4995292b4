/// Indicator pipeline: the data-transformation core behind every panel.
///
/// Architecture (executed per indicator, per render):
/// ```text
///   ┌──────────┐   no match   ┌──────────────┐
///   │  resolve  │ ───────────▶ │ placeholder   │  seeded synthetic series
///   └──────────┘              └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive?  │  join numerator/denominator on (year, iso3)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  country / year-range selections (data::filter)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ summarize + build │  → VizPackage {chart, metrics}
///   └──────────────────┘
/// ```
///
/// Each run is a pure function of (dataset, spec, filters, seed); nothing is
/// cached or mutated between renders.

pub mod catalog;
pub mod derive;
pub mod placeholder;
pub mod resolve;
pub mod summary;
pub mod viz;
