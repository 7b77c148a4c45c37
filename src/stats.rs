//! Dataset statistics for the filtered disclosures.

use crate::columns::COMPANY;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub nulls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStatistics {
    pub rows: usize,
    pub columns: usize,
    /// Null cells across the whole frame.
    pub missing_values: usize,
    /// `None` when the frame has no `COMPANY` column.
    pub distinct_companies: Option<usize>,
    pub column_profiles: Vec<ColumnProfile>,
}

impl DatasetStatistics {
    pub fn from_frame(df: &DataFrame) -> Self {
        let column_profiles: Vec<ColumnProfile> = df
            .get_columns()
            .iter()
            .map(|s| ColumnProfile {
                name: s.name().to_string(),
                dtype: s.dtype().to_string(),
                non_null: s.len() - s.null_count(),
                nulls: s.null_count(),
            })
            .collect();

        let distinct_companies = df.column(COMPANY).ok().map(|s| {
            (0..s.len())
                .filter_map(|idx| match s.get(idx) {
                    Ok(AnyValue::Null) | Err(_) => None,
                    Ok(value) => Some(value.to_string()),
                })
                .collect::<HashSet<String>>()
                .len()
        });

        DatasetStatistics {
            rows: df.height(),
            columns: df.width(),
            missing_values: column_profiles.iter().map(|p| p.nulls).sum(),
            distinct_companies,
            column_profiles,
        }
    }

    /// Aligned plain-text rendering, one line per column.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Rows: {}\nColumns: {}\nMissing values: {}\n",
            self.rows, self.columns, self.missing_values
        );
        if let Some(companies) = self.distinct_companies {
            out.push_str(&format!("Companies: {}\n", companies));
        }
        let width = self
            .column_profiles
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(0);
        for p in &self.column_profiles {
            out.push_str(&format!(
                "  {:<width$}  {:<6}  {:>6} non-null  {:>6} null\n",
                p.name,
                p.dtype,
                p.non_null,
                p.nulls,
                width = width
            ));
        }
        out
    }
}
