//! Process command - extract fields from a single slip.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use talipapa_core::export::{CsvExporter, TableExporter};
use talipapa_core::{Document, ExtractedRecord, RecordStatus};

use super::{build_processor, display_name, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let document = Document::new(display_name(&args.input), fs::read(&args.input)?);
    let processed = build_processor(&config).process_document(&document);

    if let Some(warning) = &processed.warning {
        eprintln!("{} {}: {}", style("⚠").yellow(), document.file_name, warning);
    }

    let output = format_record(&processed.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let bytes = CsvExporter::new().serialize(std::slice::from_ref(record))?;
            Ok(String::from_utf8(bytes)?)
        }
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("File:           {}\n", record.file_name()));
    output.push_str(&format!("Date:           {}\n", or_dash(record.date())));
    output.push_str(&format!("Invoice Number: {}\n", or_dash(record.invoice_number())));
    output.push_str(&format!("Amount:         {}\n", or_dash(record.amount())));
    output.push_str(&format!("Remarks:        {}\n", or_dash(record.remarks())));
    output.push_str(&format!("Status:         {}\n", record.status()));

    if record.status() == RecordStatus::CheckNeeded {
        output.push_str(&format!("\nMissing: {}\n", record.missing_fields().join(", ")));
    }

    output
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text_lists_missing_fields() {
        let record = ExtractedRecord::from_text("bill #12345 cash out 20.00", "slip.pdf");
        let text = format_text(&record);

        assert!(text.contains("Invoice Number: 12345"));
        assert!(text.contains("Date:           -"));
        assert!(text.contains("Missing: Date, Remarks"));
    }

    #[test]
    fn test_format_csv() {
        let record = ExtractedRecord::from_text("", "slip.pdf");
        let csv = format_record(&record, OutputFormat::Csv).unwrap();
        assert!(csv.ends_with(",,,,Check Needed,slip.pdf\n"));
    }
}
