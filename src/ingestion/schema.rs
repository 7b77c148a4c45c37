//! Schema validation - confirms a raw export carries the canonical disclosure layout

use crate::columns::REQUIRED_COLUMNS;
use crate::error::{PipelineError, Result};
use itertools::Itertools;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Outcome of a successful validation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaReport {
    /// Unrecognised columns that were discarded, sorted.
    pub extra_columns: Vec<String>,
}

impl SchemaReport {
    pub fn warning(&self) -> Option<String> {
        if self.extra_columns.is_empty() {
            None
        } else {
            Some(format!(
                "File contains extra columns that will be ignored: {}",
                self.extra_columns.join(", ")
            ))
        }
    }
}

pub struct SchemaValidator;

impl SchemaValidator {
    /// Checks the required column set and returns the frame in canonical order.
    ///
    /// Header names are compared after trimming, so a frame built by hand with
    /// padded names is renamed before the set comparison.
    pub fn validate(&self, df: DataFrame) -> Result<(DataFrame, SchemaReport)> {
        let df = Self::trim_column_names(df)?;

        let present: HashSet<&str> = df.get_column_names().into_iter().collect();
        let required: HashSet<&str> = REQUIRED_COLUMNS.iter().copied().collect();

        let missing: Vec<String> = required
            .difference(&present)
            .map(|c| c.to_string())
            .sorted()
            .collect();
        if !missing.is_empty() {
            warn!("Rejecting input, missing {} required columns", missing.len());
            return Err(PipelineError::Schema { missing });
        }

        let extra_columns: Vec<String> = present
            .difference(&required)
            .map(|c| c.to_string())
            .sorted()
            .collect();
        let report = SchemaReport { extra_columns };
        if let Some(message) = report.warning() {
            warn!("{}", message);
        }

        let ordered = df.select(REQUIRED_COLUMNS)?;
        info!("Schema validated: {} rows, {} columns", ordered.height(), ordered.width());
        Ok((ordered, report))
    }

    fn trim_column_names(mut df: DataFrame) -> Result<DataFrame> {
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        if names.iter().any(|n| n.trim() != n) {
            let trimmed: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
            df.set_column_names(&trimmed)?;
        }
        Ok(df)
    }
}

/// Numbered listing of the required header, for callers reporting a schema error.
pub fn required_columns_listing() -> String {
    REQUIRED_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(columns: &[&str]) -> DataFrame {
        let series: Vec<Series> = columns
            .iter()
            .map(|c| Series::new(c, &[Some("x")]))
            .collect();
        DataFrame::new(series).unwrap()
    }

    #[test]
    fn test_shuffled_columns_are_reordered() {
        let mut shuffled: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        shuffled.reverse();
        shuffled.swap(3, 17);

        let (df, report) = SchemaValidator.validate(frame_with(&shuffled)).unwrap();
        assert_eq!(df.get_column_names(), REQUIRED_COLUMNS.to_vec());
        assert!(report.extra_columns.is_empty());
        assert!(report.warning().is_none());
    }

    #[test]
    fn test_missing_column_is_named() {
        let columns: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "% POST")
            .collect();
        match SchemaValidator.validate(frame_with(&columns)) {
            Err(PipelineError::Schema { missing }) => assert_eq!(missing, vec!["% POST".to_string()]),
            other => panic!("expected schema error, got {:?}", other.map(|(df, _)| df.width())),
        }
    }

    #[test]
    fn test_extra_columns_are_reported_and_dropped() {
        let mut columns: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        columns.push("ZZ NOTES");
        columns.push("AA FLAG");

        let (df, report) = SchemaValidator.validate(frame_with(&columns)).unwrap();
        assert_eq!(df.width(), 29);
        assert_eq!(report.extra_columns, vec!["AA FLAG".to_string(), "ZZ NOTES".to_string()]);
        assert!(report.warning().unwrap().contains("AA FLAG, ZZ NOTES"));
    }

    #[test]
    fn test_padded_names_match() {
        let padded: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| format!("  {} ", c)).collect();
        let refs: Vec<&str> = padded.iter().map(|s| s.as_str()).collect();
        let (df, _) = SchemaValidator.validate(frame_with(&refs)).unwrap();
        assert_eq!(df.get_column_names()[0], "SYMBOL");
    }

    #[test]
    fn test_listing_is_numbered() {
        let listing = required_columns_listing();
        assert!(listing.starts_with("1. SYMBOL\n2. COMPANY"));
        assert!(listing.ends_with("29. XBRL"));
    }
}
