//! Output module for exporting records and reporting runs
//!
//! This module handles:
//! - The `ResultSink` seam records flow into
//! - CSV and SQLite exports
//! - Run statistics and the Markdown summary

mod atomic;
mod csv_sink;
mod markdown;
mod schema;
mod sqlite_sink;
pub mod stats;
mod traits;

pub use atomic::write_atomic;
pub use csv_sink::{render_csv, CsvSink, CSV_HEADER};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use sqlite_sink::SqliteSink;
pub use stats::{print_statistics, CategoryStats, CrawlStats};
pub use traits::{MemorySink, OutputError, OutputResult, ResultSink};

use crate::config::{OutputConfig, OutputFormat};
use std::path::Path;

/// Builds the sink selected by `[output] format`
///
/// # Arguments
///
/// * `config` - Output configuration
/// * `config_hash` - Hash stored with SQLite runs
pub fn build_sink(config: &OutputConfig, config_hash: &str) -> OutputResult<Box<dyn ResultSink>> {
    match config.format {
        OutputFormat::Csv => {
            tracing::info!("Exporting to CSV file {}", config.export_path);
            Ok(Box::new(CsvSink::new(&config.export_path)))
        }
        OutputFormat::Sqlite => {
            tracing::info!("Exporting to SQLite database {}", config.database_path);
            Ok(Box::new(SqliteSink::open(
                Path::new(&config.database_path),
                config_hash,
            )?))
        }
    }
}
