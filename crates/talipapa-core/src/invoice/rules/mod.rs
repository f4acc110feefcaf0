//! Rule-based field extractors for Talipapa cash invoices.
//!
//! Every rule runs independently over the full normalized text and returns
//! the leftmost match, or `None` when its pattern is absent.

pub mod amounts;
pub mod dates;
pub mod invoice_number;
pub mod patterns;
pub mod remarks;

pub use amounts::{extract_amount, parse_amount, AmountRule};
pub use dates::{extract_date, DateRule};
pub use invoice_number::{extract_invoice_number, InvoiceNumberRule};
pub use remarks::{extract_remarks, RemarksRule};

/// Trait for single-field extraction rules.
pub trait FieldRule {
    /// Column label of the field this rule produces.
    fn field_name(&self) -> &'static str;

    /// Extract the field from normalized text.
    fn extract(&self, normalized: &str) -> Option<String>;
}
