use std::fmt;

use polars::prelude::PolarsError;
use serde::Serialize;
use thiserror::Error;

/// Derived tables produced from the filtered dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    Filtered,
    Totals,
    MaxTransactions,
    Combined,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Filtered => "filtered dataset",
            View::Totals => "transactions summary",
            View::MaxTransactions => "max transactions",
            View::Combined => "combined summary",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Column '{column}' not found for {view}")]
    MissingColumn { view: View, column: String },

    #[error("Error generating {view}: {message}")]
    Processing { view: View, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    pub fn missing_column(view: View, column: impl Into<String>) -> Self {
        PipelineError::MissingColumn {
            view,
            column: column.into(),
        }
    }

    pub fn processing(view: View, message: impl fmt::Display) -> Self {
        PipelineError::Processing {
            view,
            message: message.to_string(),
        }
    }

    /// Fatal errors abort the whole run; the rest only disable one view.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PipelineError::MissingColumn { .. } | PipelineError::Processing { .. }
        )
    }

    /// Re-tags a low-level failure as belonging to one view.
    pub(crate) fn in_view(self, view: View) -> Self {
        match self {
            PipelineError::Polars(e) => PipelineError::processing(view, e),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
