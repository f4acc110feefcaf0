//! Bill (invoice) number extraction with a fuzzy prefix.
//!
//! OCR routinely mangles "Bill #12345" into `bil h12345`, `bilA12345` or
//! `bill12345`. The rule first locates a region anchored on `bill`/`bil`,
//! then pulls the first `[a-z]?\d{5}` token out of that region.

use super::patterns::{BILL_REGION, BILL_TOKEN};
use super::FieldRule;

/// Bill number field rule.
pub struct InvoiceNumberRule;

impl InvoiceNumberRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for InvoiceNumberRule {
    fn field_name(&self) -> &'static str {
        "Invoice Number"
    }

    fn extract(&self, normalized: &str) -> Option<String> {
        extract_invoice_number(normalized)
    }
}

/// Extract a 5-digit bill number, optionally prefixed by one letter.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    let region = BILL_REGION.find(text)?;
    BILL_TOKEN
        .find(region.as_str())
        .map(|token| token.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::normalize_text;

    #[test]
    fn test_hash_marker() {
        assert_eq!(
            extract_invoice_number("please bil #12345 today").as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn test_h_marker_is_kept_as_letter() {
        assert_eq!(
            extract_invoice_number("bill h12345 paid").as_deref(),
            Some("h12345")
        );
        assert_eq!(extract_invoice_number("bil h12345").as_deref(), Some("h12345"));
    }

    #[test]
    fn test_uppercase_marker_after_normalization() {
        let text = normalize_text("bilA12345");
        assert_eq!(extract_invoice_number(&text).as_deref(), Some("a12345"));
    }

    #[test]
    fn test_glued_double_l() {
        // The second `l` is the leftmost letter glued to the digits.
        assert_eq!(extract_invoice_number("bill12345").as_deref(), Some("l12345"));
    }

    #[test]
    fn test_up_to_three_separators() {
        assert_eq!(extract_invoice_number("bill : #12345").as_deref(), Some("12345"));
        assert_eq!(extract_invoice_number("bill ::: 12345"), None);
    }

    #[test]
    fn test_requires_five_digits() {
        assert_eq!(extract_invoice_number("bill #1234 only"), None);
    }

    #[test]
    fn test_missing_anchor() {
        assert_eq!(extract_invoice_number("invoice #12345"), None);
        assert_eq!(extract_invoice_number(""), None);
    }
}
