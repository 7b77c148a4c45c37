use anyhow::{Context, Result};
use clap::Parser;
use insider_flow::aggregation::combined::apply_materiality;
use insider_flow::export::{self, DataView};
use insider_flow::ingestion::required_columns_listing;
use insider_flow::{InsiderPipeline, PipelineConfig, PipelineError, PipelineOutcome};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "insider-flow")]
#[command(about = "Promoter market trades from NSE insider trading disclosures")]
struct Args {
    /// Disclosure export (CSV)
    input: PathBuf,

    /// Directory the summary CSVs are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Minimum total buy value for the combined summary (or set INSIDER_MATERIALITY_THRESHOLD)
    #[arg(long)]
    threshold: Option<f64>,

    /// Columns kept in filtered_data.csv, comma separated
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Keep only filtered rows where COLUMN equals VALUE
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    condition: Option<String>,

    /// Print the run report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = PipelineConfig::from_env().context("Invalid environment configuration")?;
    if let Some(threshold) = args.threshold {
        config = config.with_materiality_threshold(threshold);
    }
    info!("Materiality threshold: {}", config.materiality_threshold);

    let pipeline = InsiderPipeline::new(config);
    let outcome = match pipeline.run_path(&args.input) {
        Ok(outcome) => outcome,
        Err(e @ PipelineError::Schema { .. }) => {
            error!("{}", e);
            eprintln!("Please ensure your CSV file contains all the required columns:");
            eprintln!("{}", required_columns_listing());
            return Err(e).context(format!("Rejected {}", args.input.display()));
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to process {}", args.input.display())),
    };

    let mut view = DataView::new();
    if let Some(columns) = &args.columns {
        view = view.select(columns.iter().map(|c| c.trim().to_string()));
    }
    if let Some(raw) = &args.condition {
        let (column, value) = DataView::parse_condition(raw)?;
        view = view.filter_eq(column, value);
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Cannot create {}", args.out_dir.display()))?;
    write_outputs(&outcome, &view, &args.out_dir, pipeline.config().materiality_threshold)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report(&outcome))?);
    } else {
        println!("{}", outcome);
    }
    Ok(())
}

fn write_outputs(outcome: &PipelineOutcome, view: &DataView, out_dir: &Path, threshold: f64) -> Result<()> {
    let filtered = view.apply(&outcome.filtered).context("Cannot build the filtered view")?;
    export::write_csv(&filtered, out_dir.join(export::FILTERED_FILE))?;

    if let Ok(max) = &outcome.max_transactions {
        export::write_csv(&max.to_display_frame()?, out_dir.join(export::MAX_TRANSACTIONS_FILE))?;
    }

    match (&outcome.combined, &outcome.totals) {
        (Ok(combined), _) => export::write_csv(combined, out_dir.join(export::COMBINED_FILE))?,
        (Err(e), Ok(totals)) => {
            warn!("{}. Writing the transactions summary only.", e);
            let material = apply_materiality(totals, threshold)?;
            export::write_csv(&material, out_dir.join(export::TOTALS_FILE))?;
        }
        (Err(_), Err(_)) => warn!("No summary could be produced"),
    }
    Ok(())
}

fn report(outcome: &PipelineOutcome) -> serde_json::Value {
    let rows = |view: &Result<usize, &PipelineError>| match view {
        Ok(n) => json!({ "companies": n }),
        Err(e) => json!({ "error": e.to_string() }),
    };
    json!({
        "schema": outcome.schema,
        "filters": outcome.filter_report,
        "filter_summary": outcome.filter_report.summary(),
        "statistics": outcome.statistics,
        "transactions_summary": rows(&outcome.totals.as_ref().map(|df| df.height())),
        "max_transactions": rows(&outcome.max_transactions.as_ref().map(|m| m.len())),
        "max_transaction_records": outcome.max_transactions.as_ref().ok(),
        "combined_summary": rows(&outcome.combined.as_ref().map(|df| df.height())),
        "warnings": outcome.warnings(),
    })
}
