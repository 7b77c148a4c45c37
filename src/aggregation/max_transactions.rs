//! Max transactions: the largest single buy and sell per company.
//!
//! Two independent selections are made per side. Max-by-value and
//! max-by-shares can land on different rows, so their dates are reported
//! separately and need not agree.

use super::Side;
use crate::coerce::{numeric_values, require_column, text_values};
use crate::columns::*;
use crate::error::{PipelineError, Result, View};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Input columns the view cannot be built without.
pub const REQUIRED: [&str; 5] = [
    COMPANY,
    TRANSACTION_TYPE,
    SECURITIES_ACQUIRED,
    VALUE_ACQUIRED,
    ACQUISITION_FROM,
];

pub const OUTPUT_COLUMNS: [&str; 9] = [
    COMPANY,
    MAX_BUY_VALUE,
    MAX_BUY_VALUE_DATE,
    MAX_BUY_SHARES,
    MAX_BUY_DATE,
    MAX_SELL_VALUE,
    MAX_SELL_VALUE_DATE,
    MAX_SELL_SHARES,
    MAX_SELL_DATE,
];

#[derive(Debug, Clone, PartialEq)]
struct Transaction {
    shares: Option<f64>,
    value: Option<f64>,
    date: Option<String>,
}

/// Extremes of one side of one company. `None` means no qualifying transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideMax {
    pub max_value: Option<f64>,
    pub max_value_date: Option<String>,
    pub max_shares: Option<f64>,
    pub max_shares_date: Option<String>,
}

impl SideMax {
    fn from_transactions(rows: &[Transaction]) -> Self {
        let mut result = SideMax::default();

        if let Some(row) = Self::first_max_by_value(rows.iter()) {
            result.max_value = row.value;
            result.max_value_date = row.date.clone();
        }

        if let Some(row) = Self::max_by_shares(rows) {
            result.max_shares = row.shares;
            result.max_shares_date = row.date.clone();
        }

        result
    }

    /// First row holding the highest value; rows without a value never win.
    fn first_max_by_value<'a>(rows: impl Iterator<Item = &'a Transaction>) -> Option<&'a Transaction> {
        let mut best: Option<(f64, &Transaction)> = None;
        for row in rows {
            if let Some(value) = row.value {
                if best.map_or(true, |(top, _)| value > top) {
                    best = Some((value, row));
                }
            }
        }
        best.map(|(_, row)| row)
    }

    /// Row with the most shares; ties go to the highest value, then to the first row.
    ///
    /// When every row tied on shares lacks a value there is no winner.
    fn max_by_shares(rows: &[Transaction]) -> Option<&Transaction> {
        let top_shares = rows
            .iter()
            .filter_map(|r| r.shares)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))?;
        let tied = rows.iter().filter(|r| r.shares == Some(top_shares));
        Self::first_max_by_value(tied)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyMaxRecord {
    pub company: String,
    pub buy: SideMax,
    pub sell: SideMax,
}

impl CompanyMaxRecord {
    pub fn side(&self, side: Side) -> &SideMax {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }
}

/// One record per company, ordered by company name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaxTransactionSummary {
    pub records: Vec<CompanyMaxRecord>,
}

impl MaxTransactionSummary {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, company: &str) -> Option<&CompanyMaxRecord> {
        self.records.iter().find(|r| r.company == company)
    }

    /// Typed frame with nulls where a side has no transaction.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let records = &self.records;
        let value = |side: Side| -> Vec<Option<f64>> {
            records.iter().map(|r| r.side(side).max_value).collect()
        };
        let value_date = |side: Side| -> Vec<Option<String>> {
            records.iter().map(|r| r.side(side).max_value_date.clone()).collect()
        };
        let shares = |side: Side| -> Vec<Option<i64>> {
            records
                .iter()
                .map(|r| r.side(side).max_shares.map(|s| s as i64))
                .collect()
        };
        let shares_date = |side: Side| -> Vec<Option<String>> {
            records.iter().map(|r| r.side(side).max_shares_date.clone()).collect()
        };

        let companies: Vec<&str> = records.iter().map(|r| r.company.as_str()).collect();
        DataFrame::new(vec![
            Series::new(COMPANY, companies),
            Series::new(MAX_BUY_VALUE, value(Side::Buy)),
            Series::new(MAX_BUY_VALUE_DATE, value_date(Side::Buy)),
            Series::new(MAX_BUY_SHARES, shares(Side::Buy)),
            Series::new(MAX_BUY_DATE, shares_date(Side::Buy)),
            Series::new(MAX_SELL_VALUE, value(Side::Sell)),
            Series::new(MAX_SELL_VALUE_DATE, value_date(Side::Sell)),
            Series::new(MAX_SELL_SHARES, shares(Side::Sell)),
            Series::new(MAX_SELL_DATE, shares_date(Side::Sell)),
        ])
        .map_err(|e| PipelineError::processing(View::MaxTransactions, e))
    }

    /// Presentation form: values 0 (2 dp), shares 0, dates `N/A` where absent.
    pub fn to_display_frame(&self) -> Result<DataFrame> {
        let mut fills = Vec::with_capacity(8);
        for (value, value_date, shares, shares_date) in [
            (MAX_BUY_VALUE, MAX_BUY_VALUE_DATE, MAX_BUY_SHARES, MAX_BUY_DATE),
            (MAX_SELL_VALUE, MAX_SELL_VALUE_DATE, MAX_SELL_SHARES, MAX_SELL_DATE),
        ] {
            fills.push(col(value).fill_null(lit(0.0)).round(2));
            fills.push(col(value_date).fill_null(lit(NOT_AVAILABLE)));
            fills.push(col(shares).fill_null(lit(0i64)));
            fills.push(col(shares_date).fill_null(lit(NOT_AVAILABLE)));
        }

        self.to_frame()?
            .lazy()
            .with_columns(fills)
            .collect()
            .map_err(|e| PipelineError::processing(View::MaxTransactions, e))
    }
}

pub struct MaxTransactionAggregator;

impl MaxTransactionAggregator {
    pub fn aggregate(&self, df: &DataFrame) -> Result<MaxTransactionSummary> {
        for column in REQUIRED {
            require_column(df, column, View::MaxTransactions)?;
        }

        let companies = text_values(df, COMPANY, View::MaxTransactions)?;
        let sides = text_values(df, TRANSACTION_TYPE, View::MaxTransactions)?;
        let shares = numeric_values(df, SECURITIES_ACQUIRED, View::MaxTransactions)?;
        let values = numeric_values(df, VALUE_ACQUIRED, View::MaxTransactions)?;
        let dates = text_values(df, ACQUISITION_FROM, View::MaxTransactions)?;

        // BTreeMap keeps companies in ordinal (byte-wise, case-sensitive) order
        let mut grouped: BTreeMap<String, (Vec<Transaction>, Vec<Transaction>)> = BTreeMap::new();
        let mut skipped = 0usize;
        for idx in 0..df.height() {
            let Some(company) = companies[idx].clone() else {
                skipped += 1;
                continue;
            };
            let entry = grouped.entry(company).or_default();
            let transaction = Transaction {
                shares: shares[idx],
                value: values[idx],
                date: dates[idx].clone(),
            };
            match sides[idx].as_deref().and_then(Side::classify) {
                Some(Side::Buy) => entry.0.push(transaction),
                Some(Side::Sell) => entry.1.push(transaction),
                None => {}
            }
        }
        if skipped > 0 {
            debug!("Max transactions: skipped {} rows without a company", skipped);
        }

        let records: Vec<CompanyMaxRecord> = grouped
            .into_iter()
            .map(|(company, (buys, sells))| CompanyMaxRecord {
                company,
                buy: SideMax::from_transactions(&buys),
                sell: SideMax::from_transactions(&sells),
            })
            .collect();

        info!("Max transactions: {} companies", records.len());
        Ok(MaxTransactionSummary { records })
    }
}
