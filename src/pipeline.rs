use crate::aggregation::{MaxTransactionAggregator, MaxTransactionSummary, SummaryCombiner, TotalsAggregator};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result, View};
use crate::filters::{prune_columns, FilterPipeline, FilterReport};
use crate::ingestion::{CsvConnector, SchemaReport, SchemaValidator};
use crate::stats::DatasetStatistics;
use polars::prelude::*;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Runs one disclosure export through validation, filtering and the three summaries.
///
/// Holds only configuration; every run starts from scratch.
pub struct InsiderPipeline {
    config: PipelineConfig,
}

impl InsiderPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run_path(&self, path: impl AsRef<Path>) -> Result<PipelineOutcome> {
        self.run(CsvConnector::from_path(path)?.read_frame()?)
    }

    pub fn run_csv<R: Read>(&self, source_id: &str, reader: R) -> Result<PipelineOutcome> {
        self.run(CsvConnector::new(source_id, reader).read_frame()?)
    }

    /// Fails only on schema or filtering errors. A view that cannot be built is
    /// reported on the outcome and the remaining views are still produced.
    pub fn run(&self, raw: DataFrame) -> Result<PipelineOutcome> {
        self.config.validate()?;

        // Step 1: Schema
        let (validated, schema) = SchemaValidator.validate(raw)?;

        // Step 2: Filters
        let (filtered, filter_report) = FilterPipeline::new(&self.config).apply(&validated)?;
        if let Some(summary) = filter_report.summary() {
            info!("{}", summary);
        }

        // Step 3: Prune
        let filtered = prune_columns(&filtered);
        let statistics = DatasetStatistics::from_frame(&filtered);

        // Step 4: Aggregations
        let totals = TotalsAggregator.aggregate(&filtered);
        let max_transactions = MaxTransactionAggregator.aggregate(&filtered);

        // Step 5: Combined summary
        let combined = match (&totals, &max_transactions) {
            (Ok(totals), Ok(max)) => SummaryCombiner::new(self.config.materiality_threshold).combine(totals, max),
            (Err(_), _) => Err(PipelineError::processing(View::Combined, format!("{} unavailable", View::Totals))),
            (_, Err(_)) => Err(PipelineError::processing(
                View::Combined,
                format!("{} unavailable", View::MaxTransactions),
            )),
        };

        let outcome = PipelineOutcome {
            schema,
            filter_report,
            filtered,
            statistics,
            totals,
            max_transactions,
            combined,
        };
        for warning in outcome.warnings() {
            warn!("{}", warning);
        }
        Ok(outcome)
    }
}

/// Everything one run produced. Views that failed carry their error.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub schema: SchemaReport,
    pub filter_report: FilterReport,
    pub filtered: DataFrame,
    pub statistics: DatasetStatistics,
    pub totals: Result<DataFrame>,
    pub max_transactions: Result<MaxTransactionSummary>,
    pub combined: Result<DataFrame>,
}

impl PipelineOutcome {
    /// Skipped views, in pipeline order.
    pub fn view_errors(&self) -> Vec<&PipelineError> {
        let mut errors = Vec::new();
        if let Err(e) = &self.totals {
            errors.push(e);
        }
        if let Err(e) = &self.max_transactions {
            errors.push(e);
        }
        if let Err(e) = &self.combined {
            errors.push(e);
        }
        errors
    }

    /// Schema warning followed by one line per skipped view.
    pub fn warnings(&self) -> Vec<String> {
        self.schema
            .warning()
            .into_iter()
            .chain(self.view_errors().into_iter().map(|e| e.to_string()))
            .collect()
    }
}

impl std::fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Filtered Dataset ===")?;
        match self.filter_report.summary() {
            Some(summary) => writeln!(f, "{}", summary)?,
            None => writeln!(f, "No rows removed. Showing {} rows.", self.filter_report.final_rows())?,
        }
        write!(f, "{}", self.statistics.render())?;

        writeln!(f, "\n=== Views ===")?;
        match &self.totals {
            Ok(df) => writeln!(f, "{}: {} companies", View::Totals, df.height())?,
            Err(e) => writeln!(f, "{}: skipped ({})", View::Totals, e)?,
        }
        match &self.max_transactions {
            Ok(summary) => writeln!(f, "{}: {} companies", View::MaxTransactions, summary.len())?,
            Err(e) => writeln!(f, "{}: skipped ({})", View::MaxTransactions, e)?,
        }
        match &self.combined {
            Ok(df) => writeln!(f, "{}: {} companies", View::Combined, df.height())?,
            Err(e) => writeln!(f, "{}: skipped ({})", View::Combined, e)?,
        }

        if let Some(warning) = self.schema.warning() {
            writeln!(f, "\nWarning: {}", warning)?;
        }
        Ok(())
    }
}
