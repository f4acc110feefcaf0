//! Free-text remarks extraction.

use super::patterns::REMARKS;
use super::FieldRule;

/// Remarks field rule.
pub struct RemarksRule;

impl RemarksRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RemarksRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for RemarksRule {
    fn field_name(&self) -> &'static str {
        "Remarks"
    }

    fn extract(&self, normalized: &str) -> Option<String> {
        extract_remarks(normalized)
    }
}

/// Shortest remark kept after trimming.
const MIN_REMARKS_LEN: usize = 5;

/// Extract 5 to 30 characters following the `remarks` label, trimmed.
///
/// The length bound applies after trimming, so a trailing space picked up
/// by the pattern never lets a 4-character remark through.
pub fn extract_remarks(text: &str) -> Option<String> {
    let caps = REMARKS.captures(text)?;
    let remarks = caps[1].trim();
    if remarks.chars().count() < MIN_REMARKS_LEN {
        None
    } else {
        Some(remarks.to_string())
    }
}
