//! CSV Connector - Reads raw disclosure exports into an all-text DataFrame

use crate::error::{PipelineError, Result};
use csv::ReaderBuilder;
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Cell contents read as missing, mirroring the usual spreadsheet/pandas NA markers.
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: char = '\u{feff}';

/// CSV Connector - Wraps a reader over an exported disclosure file.
///
/// Every cell is kept as text; numeric interpretation happens later, per column,
/// through [`crate::coerce`].
pub struct CsvConnector<R: Read> {
    source_id: String,
    reader: R,
}

impl CsvConnector<std::fs::File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Ok(Self::new(path.display().to_string(), file))
    }
}

impl<'a> CsvConnector<&'a [u8]> {
    pub fn from_text(source_id: impl Into<String>, csv_text: &'a str) -> Self {
        Self::new(source_id, csv_text.as_bytes())
    }
}

impl<R: Read> CsvConnector<R> {
    pub fn new(source_id: impl Into<String>, reader: R) -> Self {
        Self {
            source_id: source_id.into(),
            reader,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    fn coerce_cell(s: &str) -> Option<String> {
        let trimmed = s.trim();
        if MISSING_TOKENS.contains(&trimmed) {
            return None;
        }
        Some(s.to_string())
    }

    /// Trims header cells and suffixes repeated names with `.1`, `.2`, ...
    fn normalize_headers(raw: &csv::StringRecord) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        raw.iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = if idx == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
                let name = h.trim().to_string();
                let count = seen.entry(name.clone()).or_insert(0);
                let unique = if *count == 0 {
                    name
                } else {
                    format!("{}.{}", name, count)
                };
                *count += 1;
                unique
            })
            .collect()
    }

    /// Consume the reader and build one String column per header.
    pub fn read_frame(self) -> Result<DataFrame> {
        let source_id = self.source_id;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(self.reader);

        let headers = Self::normalize_headers(rdr.headers()?);
        if headers.iter().all(|h| h.is_empty()) {
            return Err(PipelineError::Polars(PolarsError::NoData(
                format!("{} has no header row", source_id).into(),
            )));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut rows = 0usize;
        for result in rdr.records() {
            let record = result?;
            for (idx, column) in cells.iter_mut().enumerate() {
                column.push(record.get(idx).and_then(Self::coerce_cell));
            }
            rows += 1;
        }

        let series: Vec<Series> = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| Series::new(name, values))
            .collect();
        let df = DataFrame::new(series)?;

        info!("Read {} rows x {} columns from {}", rows, df.width(), source_id);
        debug!("Headers: {:?}", headers);
        Ok(df)
    }
}
