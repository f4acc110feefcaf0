//! Extracted record model, one per processed document.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::invoice::rules::parse_amount;
use crate::invoice::{ExtractedFields, FieldParser};

/// Completeness flag for an extracted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordStatus {
    /// All four fields were found.
    #[serde(rename = "OK")]
    Ok,
    /// At least one field is missing; a human should verify the slip.
    #[serde(rename = "Check Needed")]
    CheckNeeded,
}

impl RecordStatus {
    /// Label used in tables and spreadsheets.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Ok => "OK",
            RecordStatus::CheckNeeded => "Check Needed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from one document, tagged with its file name.
///
/// Records are immutable once built. The status is always derived from the
/// fields, never set on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Invoice Number")]
    invoice_number: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Remarks")]
    remarks: String,
    #[serde(rename = "Status")]
    status: RecordStatus,
    #[serde(rename = "File Name")]
    file_name: String,
}

impl ExtractedRecord {
    /// Build a record from extracted fields.
    pub fn new(fields: ExtractedFields, file_name: impl Into<String>) -> Self {
        let status = fields.status();
        Self {
            date: fields.date,
            invoice_number: fields.invoice_number,
            amount: fields.amount,
            remarks: fields.remarks,
            status,
            file_name: file_name.into(),
        }
    }

    /// Normalize and extract raw OCR text into a record.
    pub fn from_text(raw_text: &str, file_name: impl Into<String>) -> Self {
        Self::new(FieldParser::new().parse(raw_text), file_name)
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Numeric value of the amount, if one was extracted.
    pub fn amount_value(&self) -> Option<Decimal> {
        parse_amount(&self.amount)
    }

    /// Column labels of the fields that were not found.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields().missing()
    }

    /// Row cells in export column order.
    pub fn cells(&self) -> [&str; 6] {
        [
            self.date.as_str(),
            self.invoice_number.as_str(),
            self.amount.as_str(),
            self.remarks.as_str(),
            self.status.as_str(),
            self.file_name.as_str(),
        ]
    }

    fn fields(&self) -> ExtractedFields {
        ExtractedFields {
            date: self.date.clone(),
            invoice_number: self.invoice_number.clone(),
            amount: self.amount.clone(),
            remarks: self.remarks.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_complete() {
        let record = ExtractedRecord::from_text(
            "Date 01/02/2024 BIL h00042 cash out: 75.25 remarks: tilapia 2kg",
            "slip-1.pdf",
        );

        assert_eq!(record.date(), "01/02/2024");
        assert_eq!(record.invoice_number(), "h00042");
        assert_eq!(record.amount(), "-75.25");
        assert_eq!(record.remarks(), "tilapia 2kg");
        assert_eq!(record.status(), RecordStatus::Ok);
        assert_eq!(record.file_name(), "slip-1.pdf");
        assert_eq!(record.amount_value(), Some(Decimal::new(-7525, 2)));
        assert!(record.missing_fields().is_empty());
    }

    #[test]
    fn test_from_empty_text() {
        let record = ExtractedRecord::from_text("", "blank.pdf");

        assert_eq!(record.status(), RecordStatus::CheckNeeded);
        assert_eq!(record.cells(), ["", "", "", "", "Check Needed", "blank.pdf"]);
        assert_eq!(record.amount_value(), None);
        assert_eq!(
            record.missing_fields(),
            vec!["Date", "Invoice Number", "Amount", "Remarks"]
        );
    }

    #[test]
    fn test_serialized_keys_follow_columns() {
        let record = ExtractedRecord::from_text("cash 10.00", "a.pdf");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["Amount"], "-10.00");
        assert_eq!(json["Status"], "Check Needed");
        assert_eq!(json["File Name"], "a.pdf");
    }
}
