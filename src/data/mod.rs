/// Data layer: core types, loading, caching and filtering.
///
/// Architecture:
/// ```text
///  resultado_final_ccih.csv  (UTF-8 or Latin-1, `;`-separated)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<Dataset> per process
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  unit ∧ month ∧ organism → filtered Dataset
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
