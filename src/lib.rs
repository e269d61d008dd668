//! Aggregate statistics over purchase records.
//!
//! [`data::loader`] turns a JSON, CSV or Parquet file into a
//! [`PurchaseDataset`]; [`data::stats`] and [`data::filter`] answer the
//! individual queries; [`report`] runs them all and renders the result.

pub mod data;
pub mod error;
pub mod report;

pub use data::loader::{load_file, load_purchases};
pub use data::model::{PurchaseDataset, PurchaseRecord};
pub use error::LoadError;
pub use report::{AnalysisReport, ReportOptions};

/// Input file read by the `purchase-stats` binary.
pub const DEFAULT_PURCHASES_PATH: &str = "purchases.json";
