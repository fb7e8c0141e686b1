//! Data module - results loading and aggregation

mod aggregator;
mod loader;

pub use aggregator::{aggregate, Channel, GroupSummary, SummaryTable};
pub use loader::{load_results, FormatError, INDEPENDENT_COLUMN};
