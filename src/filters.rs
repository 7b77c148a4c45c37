//! Filter pipeline - narrows disclosures to promoter market trades in equity shares
//!
//! Each stage is self-contained: it reads one column, normalises the cell and
//! decides on that value alone. A missing cell never passes. Stages run in
//! [`FilterStage::CANONICAL`] order so the per-stage counts read naturally, but
//! any order yields the same surviving rows.

use crate::coerce::normalized_values;
use crate::columns;
use crate::config::PipelineConfig;
use crate::error::{Result, View};
use itertools::Itertools;
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

pub const EXCLUDED_REGULATION: &str = "7(3)";
pub const PROMOTER_CATEGORIES: [&str; 2] = ["promoter group", "promoters"];
pub const MARKET_SIDES: [&str; 2] = ["buy", "sell"];
pub const MARKET_MODES: [&str; 2] = ["market sale", "market purchase"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterStage {
    /// Drops filings under regulation 7(3).
    Regulation,
    Category,
    TransactionType,
    Mode,
    /// Substring match against the configured equity marker.
    SecurityTypePrior,
}

impl FilterStage {
    pub const CANONICAL: [FilterStage; 5] = [
        FilterStage::Regulation,
        FilterStage::Category,
        FilterStage::TransactionType,
        FilterStage::Mode,
        FilterStage::SecurityTypePrior,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            FilterStage::Regulation => columns::REGULATION,
            FilterStage::Category => columns::CATEGORY_OF_PERSON,
            FilterStage::TransactionType => columns::TRANSACTION_TYPE,
            FilterStage::Mode => columns::MODE_OF_ACQUISITION,
            FilterStage::SecurityTypePrior => columns::SECURITY_TYPE_PRIOR,
        }
    }

    /// Decision on an already normalised cell.
    pub fn accepts(&self, normalized: &str, equity_marker: &str) -> bool {
        match self {
            FilterStage::Regulation => normalized != EXCLUDED_REGULATION,
            FilterStage::Category => PROMOTER_CATEGORIES.contains(&normalized),
            FilterStage::TransactionType => MARKET_SIDES.contains(&normalized),
            FilterStage::Mode => MARKET_MODES.contains(&normalized),
            FilterStage::SecurityTypePrior => normalized.contains(equity_marker),
        }
    }

    /// Wording used in the removal summary.
    pub fn removal_reason(&self) -> String {
        match self {
            FilterStage::Regulation => format!("with {} '{}'", columns::REGULATION, EXCLUDED_REGULATION),
            other => format!("with other {} values", other.column()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: FilterStage,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl StageCount {
    pub fn removed(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Row counts observed while filtering. Purely diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub input_rows: usize,
    pub stages: Vec<StageCount>,
}

impl FilterReport {
    pub fn final_rows(&self) -> usize {
        self.stages.last().map(|s| s.rows_after).unwrap_or(self.input_rows)
    }

    /// e.g. `Removed 2 rows with REGULATION '7(3)', 1 rows with other MODE OF ACQUISITION values. Showing 4 filtered rows.`
    pub fn summary(&self) -> Option<String> {
        if self.final_rows() == self.input_rows {
            return None;
        }
        let removed = self
            .stages
            .iter()
            .filter(|s| s.removed() > 0)
            .map(|s| format!("{} rows {}", s.removed(), s.stage.removal_reason()))
            .join(", ");
        Some(format!("Removed {}. Showing {} filtered rows.", removed, self.final_rows()))
    }
}

pub struct FilterPipeline {
    stages: Vec<FilterStage>,
    equity_marker: String,
}

impl FilterPipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_stages(config, FilterStage::CANONICAL.to_vec())
    }

    /// A pipeline running `stages` in the given order.
    pub fn with_stages(config: &PipelineConfig, stages: Vec<FilterStage>) -> Self {
        Self {
            stages,
            equity_marker: config.equity_marker.to_lowercase(),
        }
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn apply(&self, df: &DataFrame) -> Result<(DataFrame, FilterReport)> {
        let mut report = FilterReport {
            input_rows: df.height(),
            stages: Vec::with_capacity(self.stages.len()),
        };

        let mut current = df.clone();
        for stage in &self.stages {
            let rows_before = current.height();
            current = self.apply_stage(&current, *stage)?;
            let count = StageCount {
                stage: *stage,
                rows_before,
                rows_after: current.height(),
            };
            debug!("{:?}: {} -> {} rows", stage, count.rows_before, count.rows_after);
            report.stages.push(count);
        }

        info!("Filters kept {} of {} rows", report.final_rows(), report.input_rows);
        Ok((current, report))
    }

    fn apply_stage(&self, df: &DataFrame, stage: FilterStage) -> Result<DataFrame> {
        let values = normalized_values(df, stage.column(), View::Filtered)?;
        let mask: BooleanChunked = values
            .iter()
            .map(|v| {
                v.as_deref()
                    .map_or(false, |cell| stage.accepts(cell, &self.equity_marker))
            })
            .collect();
        Ok(df.filter(&mask)?)
    }
}

/// Drops the columns in [`columns::PRUNED_COLUMNS`] that are present.
pub fn prune_columns(df: &DataFrame) -> DataFrame {
    let present: Vec<&str> = columns::PRUNED_COLUMNS
        .iter()
        .copied()
        .filter(|c| df.get_column_names().contains(c))
        .collect();
    debug!("Pruning {} columns", present.len());
    df.drop_many(present.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::*;

    const MARKER: &str = "equity share";

    fn sample() -> DataFrame {
        df!(
            REGULATION => &[Some("7(2)"), Some(" 7(3) "), Some("7(2)"), None, Some("7(2)"), Some("7(2)")],
            CATEGORY_OF_PERSON => &[Some("Promoter Group"), Some("Promoters"), Some("PROMOTERS "), Some("Promoters"), Some("Director"), None],
            TRANSACTION_TYPE => &[Some(" buy "), Some("Sell"), Some("SELL"), Some("Buy"), Some("Buy"), Some("Buy")],
            MODE_OF_ACQUISITION => &[Some("Market Purchase"), Some("Market Sale"), Some("market sale"), Some("Market Purchase"), Some("Market Purchase"), Some("Market Purchase")],
            SECURITY_TYPE_PRIOR => &[Some("Equity Shares"), Some("Equity Shares"), Some("equity share"), Some("Equity Shares"), Some("Equity Shares"), Some("Equity Shares")]
        )
        .unwrap()
    }

    #[test]
    fn test_stage_accepts() {
        assert!(FilterStage::Regulation.accepts("7(2)", MARKER));
        assert!(!FilterStage::Regulation.accepts("7(3)", MARKER));
        assert!(FilterStage::Category.accepts("promoter group", MARKER));
        assert!(!FilterStage::Category.accepts("promoter group member", MARKER));
        assert!(FilterStage::TransactionType.accepts("sell", MARKER));
        assert!(!FilterStage::TransactionType.accepts("pledge", MARKER));
        assert!(FilterStage::Mode.accepts("market purchase", MARKER));
        assert!(!FilterStage::Mode.accepts("off market", MARKER));
        assert!(FilterStage::SecurityTypePrior.accepts("equity shares", MARKER));
        assert!(!FilterStage::SecurityTypePrior.accepts("warrants", MARKER));
    }

    #[test]
    fn test_apply_counts_each_stage() {
        let pipeline = FilterPipeline::new(&PipelineConfig::default());
        let (filtered, report) = pipeline.apply(&sample()).unwrap();

        assert_eq!(filtered.height(), 2);
        assert_eq!(report.input_rows, 6);
        let removed: Vec<usize> = report.stages.iter().map(|s| s.removed()).collect();
        // null regulation and 7(3) go first, then Director and null category
        assert_eq!(removed, vec![2, 2, 0, 0, 0]);

        let summary = report.summary().unwrap();
        assert!(summary.starts_with("Removed 2 rows with REGULATION '7(3)', 2 rows with other CATEGORY OF PERSON values."));
        assert!(summary.ends_with("Showing 2 filtered rows."));
    }

    #[test]
    fn test_nothing_removed_has_no_summary() {
        let df = sample().slice(0, 1);
        let (_, report) = FilterPipeline::new(&PipelineConfig::default()).apply(&df).unwrap();
        assert_eq!(report.final_rows(), 1);
        assert!(report.summary().is_none());
    }

    #[test]
    fn test_prune_tolerates_absent_columns() {
        let df = df!(
            COMPANY => &["A"],
            REMARK => &["r"],
            XBRL => &["x"]
        )
        .unwrap();
        let pruned = prune_columns(&df);
        assert_eq!(pruned.get_column_names(), vec![COMPANY]);
        assert_eq!(prune_columns(&pruned).get_column_names(), vec![COMPANY]);
    }
}
