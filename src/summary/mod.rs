//! Aggregated views over a user's movements.

mod aggregation;
mod handlers;

pub use aggregation::{EntryCategory, LedgerEntry};
pub use handlers::{SummaryState, get_monthly_series_endpoint, get_summary_endpoint};
