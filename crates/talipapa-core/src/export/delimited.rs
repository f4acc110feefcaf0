//! CSV export.

use super::{Result, TableExporter, COLUMNS};
use crate::error::ExportError;
use crate::models::record::ExtractedRecord;

/// Exports records as CSV with a header row.
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExporter for CsvExporter {
    fn serialize(&self, records: &[ExtractedRecord]) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        wtr.write_record(COLUMNS)?;
        for record in records {
            wtr.write_record(record.cells())?;
        }

        wtr.into_inner()
            .map_err(|e| ExportError::Buffer(e.to_string()))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }
}
