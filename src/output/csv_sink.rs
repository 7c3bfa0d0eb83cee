//! CSV export of product records

use crate::model::ProductRecord;
use crate::output::atomic::write_atomic;
use crate::output::traits::{OutputError, OutputResult, ResultSink};
use std::path::PathBuf;

/// Column headers of the export, in order
pub const CSV_HEADER: [&str; 6] = ["Category", "Name", "Color", "Price", "Link", "Image (.webp)"];

/// Tabular export written to a single CSV file
///
/// Records are buffered and the file is written on `finish`, through a
/// temporary file renamed into place. An interrupted run leaves any previous
/// export untouched.
pub struct CsvSink {
    path: PathBuf,
    records: Vec<ProductRecord>,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }
}

impl ResultSink for CsvSink {
    fn append(&mut self, record: ProductRecord) -> OutputResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        let bytes = render_csv(&self.records)?;
        write_atomic(&self.path, &bytes)?;

        tracing::info!(
            "Exported {} records to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Renders records as CSV, header first
pub fn render_csv(records: &[ProductRecord]) -> OutputResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        writer.write_record([
            record.category.as_str(),
            record.title.as_str(),
            record.color.as_str(),
            record.price_cell().as_str(),
            record.link.as_str(),
            record.image_path.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| OutputError::Write(e.to_string()))
}
