//! CSV export and ad-hoc views of the filtered dataset.

use crate::coerce::{require_column, text_values};
use crate::error::{PipelineError, Result, View};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

pub const FILTERED_FILE: &str = "filtered_data.csv";
pub const MAX_TRANSACTIONS_FILE: &str = "max_transactions_summary.csv";
pub const TOTALS_FILE: &str = "transactions_summary.csv";
pub const COMBINED_FILE: &str = "combined_transactions_summary.csv";

/// Renders `df` as comma-separated text with a header row.
pub fn to_csv_string(df: &DataFrame) -> Result<String> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut owned = df.clone();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut owned)?;
    String::from_utf8(buffer).map_err(|e| PipelineError::processing(View::Filtered, e))
}

pub fn write_csv(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    let mut owned = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut owned)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Column selection plus an optional exact-match row filter.
///
/// `columns: None` keeps every column; `Some(vec![])` is rejected.
#[derive(Debug, Clone, Default)]
pub struct DataView {
    pub columns: Option<Vec<String>>,
    pub equals: Option<(String, String)>,
}

impl DataView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.equals = Some((column.into(), value.into()));
        self
    }

    /// Parses `COLUMN=VALUE`. Splits on the first `=`.
    pub fn parse_condition(raw: &str) -> Result<(String, String)> {
        match raw.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => {
                Ok((column.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(PipelineError::Config(format!(
                "expected COLUMN=VALUE, got '{}'",
                raw
            ))),
        }
    }

    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut view = df.clone();

        if let Some((column, value)) = &self.equals {
            let cells = text_values(&view, column, View::Filtered)?;
            let mask: BooleanChunked = cells
                .iter()
                .map(|cell| cell.as_deref().map(str::trim) == Some(value.as_str()))
                .collect();
            view = view.filter(&mask)?;
        }

        if let Some(columns) = &self.columns {
            if columns.is_empty() {
                return Err(PipelineError::processing(
                    View::Filtered,
                    "select at least one column",
                ));
            }
            for column in columns {
                require_column(&view, column, View::Filtered)?;
            }
            view = view.select(columns)?;
        }

        Ok(view)
    }
}
