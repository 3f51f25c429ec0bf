/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///   production_basic_aggregated.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV, strict dates, drop bad rows → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  load once per file identity, Arc<Table>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  country × source membership → FilteredTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  Σ production, mean efficiency, Σ hours
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
pub mod summary;
