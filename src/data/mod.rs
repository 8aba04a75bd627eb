/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → OrderDataset (fails whole load on a bad cell)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ OrderDataset  │  Vec<OrderRecord>, statuses, purchase span
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + status → FilteredView (row indices)
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
