//! Invoice field extraction module.

mod normalize;
mod parser;
pub mod rules;

pub use normalize::normalize_text;
pub use parser::{ExtractedFields, FieldParser};
