pub mod aggregation;
pub mod coerce;
pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod ingestion;
pub mod pipeline;
pub mod stats;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result, View};
pub use pipeline::{InsiderPipeline, PipelineOutcome};
