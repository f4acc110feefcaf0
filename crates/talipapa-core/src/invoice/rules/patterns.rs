//! Common regex patterns for Talipapa invoice extraction.
//!
//! All patterns expect text that already went through
//! [`normalize_text`](crate::invoice::normalize_text).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Normalization
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // DD-MM-YYYY or DD/MM/YYYY, separators drawn independently from [-/]
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{2}[-/]\d{2}[-/]\d{4})\b"
    ).unwrap();

    // Bill number region: "bill"/"bil", up to 3 non-word chars, optional marker
    // and optional glued letter before five digits. `A` is kept for raw-text
    // callers; normalized text only ever reaches it through `[a-z]?`.
    pub static ref BILL_REGION: Regex = Regex::new(
        r"(bill|bil)[^\w]{0,3}[#hA]?[a-z]?\d{5}"
    ).unwrap();

    pub static ref BILL_TOKEN: Regex = Regex::new(
        r"[a-z]?\d{5}"
    ).unwrap();

    // Cash-out amount: "cash", optional "ou"/"out"/"out?", optional separator
    // and sign, then digits with exactly two decimals.
    pub static ref CASH_OUT: Regex = Regex::new(
        r"cash(?:\s*out?\??)?\s*[-:]?\s*-?([0-9]+\.\d{2})"
    ).unwrap();

    // Remarks: 5 to 30 chars from the allowed set, first one non-space.
    pub static ref REMARKS: Regex = Regex::new(
        r"remarks\s*[:\-]?\s*([a-z0-9,.\-][a-z0-9 ,.\-]{4,29})"
    ).unwrap();
}
