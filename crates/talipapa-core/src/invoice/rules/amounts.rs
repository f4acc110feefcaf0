//! Cash-out amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::CASH_OUT;
use super::FieldRule;

/// Cash-out amount field rule.
pub struct AmountRule;

impl AmountRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for AmountRule {
    fn field_name(&self) -> &'static str {
        "Amount"
    }

    fn extract(&self, normalized: &str) -> Option<String> {
        extract_amount(normalized)
    }
}

/// Extract the first cash-out amount as a negative two-decimal string.
///
/// Every entry on a Talipapa slip is an outflow, so the sign is normalized
/// to `-` whether or not the slip printed one.
pub fn extract_amount(text: &str) -> Option<String> {
    CASH_OUT
        .captures(text)
        .map(|caps| format!("-{}", &caps[1]))
}

/// Parse an extracted amount string into a decimal value.
pub fn parse_amount(amount: &str) -> Option<Decimal> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}
