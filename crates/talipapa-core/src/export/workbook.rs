//! Excel workbook export using rust_xlsxwriter.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};

use super::{Result, TableExporter, COLUMNS};
use crate::models::record::ExtractedRecord;

const AMOUNT_COLUMN: u16 = 2;

/// Exports records as a single-sheet XLSX workbook.
pub struct XlsxExporter {
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            sheet_name: "Talipapa".to_string(),
        }
    }

    /// Set the worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExporter for XlsxExporter {
    fn serialize(&self, records: &[ExtractedRecord]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let amount_format = Format::new().set_num_format("0.00");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, header) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (i, record) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            for (col, cell) in record.cells().iter().enumerate() {
                let col = col as u16;
                // Amounts go in as numbers so the sheet can sum them.
                let amount = (col == AMOUNT_COLUMN)
                    .then(|| record.amount_value().and_then(exact_f64))
                    .flatten();

                match amount {
                    Some(value) => {
                        worksheet.write_number_with_format(row, col, value, &amount_format)?;
                    }
                    None => {
                        worksheet.write_string(row, col, *cell)?;
                    }
                }
            }
        }

        worksheet.autofit();

        Ok(workbook.save_to_buffer()?)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn mime_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }
}

/// `value` as a float, or `None` when the float would not print back to
/// the same decimal text.
fn exact_f64(value: Decimal) -> Option<f64> {
    let float = value.to_f64()?;
    let printed = format!("{:.*}", value.scale() as usize, float);
    (printed == value.to_string()).then_some(float)
}
