//! OCR text normalization.

use super::rules::patterns::WHITESPACE_RUN;

/// Collapse every whitespace run to a single space and lowercase the text.
///
/// Punctuation and digits are left untouched and nothing is trimmed, so a
/// leading or trailing run survives as one space. Empty input yields empty
/// output.
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_double_whitespace(s: &str) -> bool {
        let chars: Vec<char> = s.chars().collect();
        chars.windows(2).any(|w| w[0].is_whitespace() && w[1].is_whitespace())
    }

    #[test]
    fn test_collapses_whitespace_and_lowercases() {
        assert_eq!(
            normalize_text("Bill  #12345\n\tCASH OUT:\r\n 1500.00"),
            "bill #12345 cash out: 1500.00"
        );
    }

    #[test]
    fn test_keeps_edges_as_single_space() {
        assert_eq!(normalize_text("\n\n  Remarks \n"), " remarks ");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_punctuation_and_digits_untouched() {
        assert_eq!(normalize_text("12/04/2024 - #A1,.:?"), "12/04/2024 - #a1,.:?");
    }

    #[test]
    fn test_output_properties() {
        let samples = [
            "",
            "   ",
            "ALL CAPS\n\n\nTEXT",
            "Mixed\u{00a0}\u{2003}Unicode  Spaces",
            "Tabs\t\tand\r\nCRLF",
            "Déjà VU  Ñandú",
            "already normalized text",
        ];

        for sample in samples {
            let once = normalize_text(sample);
            assert!(!has_double_whitespace(&once), "double whitespace in {:?}", once);
            assert!(!once.chars().any(char::is_uppercase), "uppercase in {:?}", once);
            assert_eq!(normalize_text(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
