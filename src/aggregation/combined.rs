//! Combined summary: totals and max transactions side by side, gated by materiality.

use super::max_transactions::MaxTransactionSummary;
use crate::coerce::require_column;
use crate::columns::*;
use crate::error::{PipelineError, Result, View};
use itertools::Itertools;
use polars::prelude::*;
use tracing::{debug, info};

const BUY_ORDER: [&str; 7] = [
    MAX_BUY_DATE,
    MAX_BUY_VALUE,
    MAX_BUY_SHARES,
    MAX_AVG_BUY,
    DELTA_BUY,
    TOTAL_SHARE_BUYS,
    TOTAL_VALUE_BUY,
];

const SELL_ORDER: [&str; 7] = [
    MAX_SELL_DATE,
    MAX_SELL_VALUE,
    MAX_SELL_SHARES,
    MAX_AVG_SELL,
    DELTA_SELL,
    TOTAL_SHARE_SELLS,
    TOTAL_VALUE_SELL,
];

/// `COMPANY`, `SYMBOL`, the buy block, the sell block, then anything else.
///
/// Within a block the fixed order comes first and unlisted columns of the same
/// side follow alphabetically. Names not present in `names` are left out.
pub fn summary_column_order(names: &[&str]) -> Vec<String> {
    let block = |marker: &str, fixed: &[&str]| -> Vec<String> {
        let side: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| *n != COMPANY && *n != SYMBOL && n.contains(marker))
            .collect();
        let mut ordered: Vec<String> = fixed
            .iter()
            .filter(|c| side.contains(*c))
            .map(|c| c.to_string())
            .collect();
        ordered.extend(
            side.iter()
                .filter(|c| !fixed.contains(*c))
                .sorted()
                .map(|c| c.to_string()),
        );
        ordered
    };

    let buy = block("Buy", &BUY_ORDER[..]);
    let sell = block("Sell", &SELL_ORDER[..]);

    let mut order: Vec<String> = [COMPANY, SYMBOL]
        .iter()
        .filter(|c| names.contains(*c))
        .map(|c| c.to_string())
        .collect();
    let others: Vec<String> = names
        .iter()
        .filter(|n| !order.iter().any(|o| o == *n))
        .filter(|n| !buy.iter().any(|b| b == *n) && !sell.iter().any(|s| s == *n))
        .sorted()
        .map(|n| n.to_string())
        .collect();
    order.extend(buy);
    order.extend(sell);
    order.extend(others);
    order
}

/// Keeps companies whose total buy value reaches `threshold` (inclusive).
pub fn apply_materiality(df: &DataFrame, threshold: f64) -> Result<DataFrame> {
    require_column(df, TOTAL_VALUE_BUY, View::Combined)?;
    df.clone()
        .lazy()
        .filter(col(TOTAL_VALUE_BUY).gt_eq(lit(threshold)))
        .collect()
        .map_err(|e| PipelineError::processing(View::Combined, e))
}

/// `value / shares`, 0 when shares are missing or not positive, 2 dp.
fn average_price(value: &str, shares: &str, alias: &str) -> Expr {
    when(col(shares).gt(lit(0)))
        .then(col(value) / col(shares).cast(DataType::Float64))
        .otherwise(lit(0.0))
        .round(2)
        .alias(alias)
}

pub struct SummaryCombiner {
    threshold: f64,
}

impl SummaryCombiner {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn combine(&self, totals: &DataFrame, max: &MaxTransactionSummary) -> Result<DataFrame> {
        require_column(totals, COMPANY, View::Combined)?;
        require_column(totals, TOTAL_VALUE_BUY, View::Combined)?;
        let max_frame = max.to_display_frame().map_err(|e| e.in_view(View::Combined))?;

        let joined = totals
            .clone()
            .lazy()
            .join(
                max_frame.lazy(),
                [col(COMPANY)],
                [col(COMPANY)],
                JoinArgs::new(JoinType::Outer).with_coalesce(JoinCoalesce::CoalesceColumns),
            )
            .collect()
            .map_err(|e| PipelineError::processing(View::Combined, e))?;
        debug!("Combined join: {} rows", joined.height());

        let fills: Vec<Expr> = joined
            .get_columns()
            .iter()
            .filter(|s| s.name() != COMPANY && s.name() != SYMBOL)
            .filter_map(|s| match s.dtype() {
                DataType::Int64 => Some(col(s.name()).fill_null(lit(0i64))),
                DataType::Float64 => Some(col(s.name()).fill_null(lit(0.0))),
                DataType::String if s.name().ends_with("Date") => {
                    Some(col(s.name()).fill_null(lit(NOT_AVAILABLE)))
                }
                _ => None,
            })
            .collect();

        let filled = joined
            .lazy()
            .with_columns(fills)
            .with_columns([
                average_price(MAX_BUY_VALUE, MAX_BUY_SHARES, MAX_AVG_BUY),
                average_price(MAX_SELL_VALUE, MAX_SELL_SHARES, MAX_AVG_SELL),
            ])
            .collect()
            .map_err(|e| PipelineError::processing(View::Combined, e))?;

        let material = apply_materiality(&filled, self.threshold)?;
        let order = summary_column_order(&material.get_column_names());
        let combined = material
            .select(order)
            .and_then(|df| df.sort([COMPANY], SortMultipleOptions::default().with_maintain_order(true)))
            .map_err(|e| PipelineError::processing(View::Combined, e))?;

        info!(
            "Combined summary: {} of {} companies at or above {}",
            combined.height(),
            filled.height(),
            self.threshold
        );
        Ok(combined)
    }
}
