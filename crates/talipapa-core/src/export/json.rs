//! JSON export.

use super::{Result, TableExporter};
use crate::models::record::ExtractedRecord;

/// Exports records as a pretty-printed JSON array.
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExporter for JsonExporter {
    fn serialize(&self, records: &[ExtractedRecord]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(records)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}
