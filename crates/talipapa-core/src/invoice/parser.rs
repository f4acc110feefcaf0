//! Field parser combining normalization and the extraction rules.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::models::record::RecordStatus;

use super::normalize::normalize_text;
use super::rules::{AmountRule, DateRule, FieldRule, InvoiceNumberRule, RemarksRule};

/// The four fields recognized on a cash slip.
///
/// An empty string means the field's pattern was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub date: String,
    pub invoice_number: String,
    pub amount: String,
    pub remarks: String,
}

impl ExtractedFields {
    /// Derive the record status from field completeness.
    pub fn status(&self) -> RecordStatus {
        if self.missing().is_empty() {
            RecordStatus::Ok
        } else {
            RecordStatus::CheckNeeded
        }
    }

    /// Column labels of the fields that were not found.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("Date", &self.date),
            ("Invoice Number", &self.invoice_number),
            ("Amount", &self.amount),
            ("Remarks", &self.remarks),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Parser applying every field rule to normalized OCR text.
pub struct FieldParser {
    date: DateRule,
    invoice_number: InvoiceNumberRule,
    amount: AmountRule,
    remarks: RemarksRule,
}

impl FieldParser {
    /// Create a parser with the standard Talipapa rules.
    pub fn new() -> Self {
        Self {
            date: DateRule::new(),
            invoice_number: InvoiceNumberRule::new(),
            amount: AmountRule::new(),
            remarks: RemarksRule::new(),
        }
    }

    /// Normalize raw OCR text and extract all fields.
    ///
    /// Never fails: a rule that finds nothing leaves its field empty.
    pub fn parse(&self, raw_text: &str) -> ExtractedFields {
        let normalized = normalize_text(raw_text);
        self.parse_normalized(&normalized)
    }

    /// Extract all fields from text that is already normalized.
    pub fn parse_normalized(&self, normalized: &str) -> ExtractedFields {
        let fields = ExtractedFields {
            date: run_rule(&self.date, normalized),
            invoice_number: run_rule(&self.invoice_number, normalized),
            amount: run_rule(&self.amount, normalized),
            remarks: run_rule(&self.remarks, normalized),
        };

        debug!(
            "Extracted fields from {} chars, missing: {:?}",
            normalized.len(),
            fields.missing()
        );

        fields
    }
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new()
    }
}

fn run_rule(rule: &impl FieldRule, normalized: &str) -> String {
    match rule.extract(normalized) {
        Some(value) => value,
        None => {
            trace!("{} not found", rule.field_name());
            String::new()
        }
    }
}
