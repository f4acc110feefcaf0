//! Date extraction.
//!
//! Dates are kept as the text found on the slip. Cash slips are filled in by
//! hand and OCR output is noisy, so no calendar parsing is attempted.

use super::patterns::DATE_DMY;
use super::FieldRule;

/// Date field rule.
pub struct DateRule;

impl DateRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRule for DateRule {
    fn field_name(&self) -> &'static str {
        "Date"
    }

    fn extract(&self, normalized: &str) -> Option<String> {
        extract_date(normalized)
    }
}

/// Extract the first `DD-MM-YYYY` / `DD/MM/YYYY` token, verbatim.
pub fn extract_date(text: &str) -> Option<String> {
    DATE_DMY.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date_dashes() {
        assert_eq!(
            extract_date("invoice dated 04-07-2024 for goods").as_deref(),
            Some("04-07-2024")
        );
    }

    #[test]
    fn test_extract_date_slashes() {
        assert_eq!(extract_date("date: 12/04/2024").as_deref(), Some("12/04/2024"));
    }

    #[test]
    fn test_two_digit_year_rejected() {
        assert_eq!(extract_date("04-07-24"), None);
    }

    #[test]
    fn test_no_calendar_validation() {
        assert_eq!(extract_date("99-99-9999").as_deref(), Some("99-99-9999"));
    }

    #[test]
    fn test_first_date_wins() {
        assert_eq!(
            extract_date("from 01-02-2024 to 03-04-2024").as_deref(),
            Some("01-02-2024")
        );
    }

    #[test]
    fn test_requires_word_boundary() {
        assert_eq!(extract_date("ref 104-07-20245"), None);
        assert_eq!(extract_date("single digit 4-07-2024"), None);
    }
}
