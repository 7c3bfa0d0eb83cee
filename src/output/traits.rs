//! Result sink trait and output errors
//!
//! A sink receives every extracted record in encounter order and is finished
//! exactly once when the crawl ends.

use crate::model::ProductRecord;
use thiserror::Error;

/// Errors that can occur while exporting records
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted product records
///
/// Records arrive in category, page and DOM order; sinks must preserve it.
/// Any error returned here is fatal for the run.
pub trait ResultSink {
    /// Appends one record
    fn append(&mut self, record: ProductRecord) -> OutputResult<()>;

    /// Flushes everything appended so far to durable storage
    fn finish(&mut self) -> OutputResult<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn append(&mut self, record: ProductRecord) -> OutputResult<()> {
        (**self).append(record)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// Sink keeping records in memory, for callers that post-process them
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ProductRecord>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records appended so far, in order
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Returns true once `finish` has been called
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ResultSink for MemorySink {
    fn append(&mut self, record: ProductRecord) -> OutputResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
