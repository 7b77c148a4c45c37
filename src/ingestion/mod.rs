//! Ingestion Module
//!
//! Turns an uploaded disclosure export into a validated, canonically ordered
//! DataFrame:
//! - CSV reading with every cell kept as text
//! - Header trimming and missing-value recognition
//! - Required column check and reordering

pub mod csv_connector;
pub mod schema;

pub use csv_connector::{CsvConnector, MISSING_TOKENS};
pub use schema::{required_columns_listing, SchemaReport, SchemaValidator};
