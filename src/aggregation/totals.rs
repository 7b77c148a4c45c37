//! Transactions summary: per-company buy and sell totals.

use super::Side;
use crate::coerce::{numeric_values, require_column, text_values};
use crate::columns::*;
use crate::error::{PipelineError, Result, View};
use polars::prelude::*;
use tracing::{debug, info};

const SIDE: &str = "__side";
const SHARES: &str = "__shares";
const VALUE: &str = "__value";
const DELTA: &str = "__delta";
const SELL_SYMBOL: &str = "__sell_symbol";

/// Input columns the summary cannot be built without.
pub const REQUIRED: [&str; 7] = [
    COMPANY,
    SYMBOL,
    TRANSACTION_TYPE,
    SECURITIES_ACQUIRED,
    VALUE_ACQUIRED,
    SHAREHOLDING_PRIOR,
    SHAREHOLDING_POST,
];

/// Output layout, one row per company.
pub const OUTPUT_COLUMNS: [&str; 8] = [
    COMPANY,
    SYMBOL,
    TOTAL_SHARE_BUYS,
    TOTAL_VALUE_BUY,
    DELTA_BUY,
    TOTAL_SHARE_SELLS,
    TOTAL_VALUE_SELL,
    DELTA_SELL,
];

struct SideColumns {
    symbol: &'static str,
    shares: &'static str,
    value: &'static str,
    delta: &'static str,
}

impl SideColumns {
    fn of(side: Side) -> Self {
        match side {
            Side::Buy => SideColumns {
                symbol: SYMBOL,
                shares: TOTAL_SHARE_BUYS,
                value: TOTAL_VALUE_BUY,
                delta: DELTA_BUY,
            },
            Side::Sell => SideColumns {
                symbol: SELL_SYMBOL,
                shares: TOTAL_SHARE_SELLS,
                value: TOTAL_VALUE_SELL,
                delta: DELTA_SELL,
            },
        }
    }
}

/// Sums shares, value and shareholding delta per company and side.
///
/// The delta of a company is the sum of per-transaction deltas
/// (`% POST - % SHAREHOLDING (PRIOR)` on each row), not the difference between
/// its last and first snapshot. Cells that do not parse as numbers are left
/// out of the sums rather than counted as zero.
pub struct TotalsAggregator;

impl TotalsAggregator {
    pub fn aggregate(&self, df: &DataFrame) -> Result<DataFrame> {
        let prepared = Self::prepare(df)?;
        debug!("Totals input: {} rows", prepared.height());

        let buy = Self::side_totals(prepared.clone().lazy(), Side::Buy);
        let sell = Self::side_totals(prepared.lazy(), Side::Sell);

        let buy_cols = SideColumns::of(Side::Buy);
        let sell_cols = SideColumns::of(Side::Sell);

        let summary = buy
            .join(
                sell,
                [col(COMPANY)],
                [col(COMPANY)],
                JoinArgs::new(JoinType::Outer).with_coalesce(JoinCoalesce::CoalesceColumns),
            )
            .with_columns([
                col(SYMBOL).fill_null(col(SELL_SYMBOL)).alias(SYMBOL),
                col(buy_cols.shares).fill_null(lit(0.0)).cast(DataType::Int64),
                col(buy_cols.value).fill_null(lit(0.0)).round(2),
                col(buy_cols.delta).fill_null(lit(0.0)).round(4),
                col(sell_cols.shares).fill_null(lit(0.0)).cast(DataType::Int64),
                col(sell_cols.value).fill_null(lit(0.0)).round(2),
                col(sell_cols.delta).fill_null(lit(0.0)).round(4),
            ])
            .select(OUTPUT_COLUMNS.iter().map(|c| col(c)).collect::<Vec<_>>())
            .sort([COMPANY], SortMultipleOptions::default().with_maintain_order(true))
            .collect()
            .map_err(|e| PipelineError::processing(View::Totals, e))?;

        info!("Transactions summary: {} companies", summary.height());
        Ok(summary)
    }

    /// Typed working frame: company, symbol, side key, and the three numeric measures.
    fn prepare(df: &DataFrame) -> Result<DataFrame> {
        for column in REQUIRED {
            require_column(df, column, View::Totals)?;
        }

        let companies = text_values(df, COMPANY, View::Totals)?;
        let symbols = text_values(df, SYMBOL, View::Totals)?;
        let sides: Vec<Option<&str>> = text_values(df, TRANSACTION_TYPE, View::Totals)?
            .iter()
            .map(|v| v.as_deref().and_then(Side::classify).map(|s| s.key()))
            .collect();
        let shares = numeric_values(df, SECURITIES_ACQUIRED, View::Totals)?;
        let values = numeric_values(df, VALUE_ACQUIRED, View::Totals)?;
        let prior = numeric_values(df, SHAREHOLDING_PRIOR, View::Totals)?;
        let post = numeric_values(df, SHAREHOLDING_POST, View::Totals)?;

        let deltas: Vec<Option<f64>> = prior
            .iter()
            .zip(&post)
            .map(|(before, after)| match (before, after) {
                (Some(before), Some(after)) => Some(after - before),
                _ => None,
            })
            .collect();

        DataFrame::new(vec![
            Series::new(COMPANY, companies),
            Series::new(SYMBOL, symbols),
            Series::new(SIDE, sides),
            Series::new(SHARES, shares),
            Series::new(VALUE, values),
            Series::new(DELTA, deltas),
        ])
        .map_err(|e| PipelineError::processing(View::Totals, e))
    }

    fn side_totals(prepared: LazyFrame, side: Side) -> LazyFrame {
        let names = SideColumns::of(side);
        prepared
            .filter(col(COMPANY).is_not_null().and(col(SIDE).eq(lit(side.key()))))
            .group_by_stable([col(COMPANY)])
            .agg([
                col(SYMBOL).first().alias(names.symbol),
                col(SHARES).sum().alias(names.shares),
                col(VALUE).sum().alias(names.value),
                col(DELTA).sum().alias(names.delta),
            ])
    }
}
