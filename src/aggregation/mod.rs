//! Per-company views over the filtered disclosures.

pub mod combined;
pub mod max_transactions;
pub mod totals;

pub use combined::{summary_column_order, SummaryCombiner};
pub use max_transactions::{CompanyMaxRecord, MaxTransactionAggregator, MaxTransactionSummary, SideMax};
pub use totals::TotalsAggregator;

use crate::coerce::normalize;
use serde::Serialize;

/// Direction of a market transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Classifies a raw `ACQUISITION/DISPOSAL TRANSACTION TYPE` cell.
    pub fn classify(raw: &str) -> Option<Side> {
        match normalize(raw).as_str() {
            "buy" => Some(Side::Buy),
            "sell" => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}
