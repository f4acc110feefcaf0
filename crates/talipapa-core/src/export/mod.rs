//! Table export of extracted records.

mod delimited;
mod json;
mod workbook;

pub use delimited::CsvExporter;
pub use json::JsonExporter;
pub use workbook::XlsxExporter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;
use crate::models::record::ExtractedRecord;

/// Column headers, in output order.
pub const COLUMNS: [&str; 6] = [
    "Date",
    "Invoice Number",
    "Amount",
    "Remarks",
    "Status",
    "File Name",
];

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Trait for table serializers.
pub trait TableExporter {
    /// Serialize records, in order, into a downloadable byte stream.
    fn serialize(&self, records: &[ExtractedRecord]) -> Result<Vec<u8>>;

    /// File extension of the produced artifact.
    fn extension(&self) -> &'static str;

    /// MIME type of the produced artifact.
    fn mime_type(&self) -> &'static str;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
    /// JSON array of records
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Create the exporter for this format.
    pub fn exporter(&self, sheet_name: &str) -> Box<dyn TableExporter> {
        match self {
            ExportFormat::Xlsx => Box::new(XlsxExporter::new().with_sheet_name(sheet_name)),
            ExportFormat::Csv => Box::new(CsvExporter::new()),
            ExportFormat::Json => Box::new(JsonExporter::new()),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("XLSX".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!("csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("ods".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_exporter_extension_matches_format() {
        for format in [ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Json] {
            assert_eq!(format.exporter("Sheet1").extension(), format.extension());
        }
    }
}
