/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + shape-check → PurchaseDataset (empty on failure)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ PurchaseDataset  │  Vec<PurchaseRecord>, file order
///   └─────────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  filter   │  pure single-pass queries
///   └──────────┘   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
