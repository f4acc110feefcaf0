//! Batch command - process several slips and export one spreadsheet.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use talipapa_core::{
    BatchReport, Document, DocumentKind, ExportFormat, ExtractedRecord, ProcessedDocument,
    RecordStatus, COLUMNS,
};

use super::{build_processor, display_name, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob patterns, processed in the order given
    inputs: Vec<String>,

    /// Spreadsheet output path (default: talipapa_output.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spreadsheet format (default: from config, xlsx)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Only print the results table, do not write a spreadsheet
    #[arg(long)]
    no_export: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FormatArg {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
    /// JSON array
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        println!("{} No files to process.", style("ℹ").blue());
        return Ok(());
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );

    let processor = build_processor(&config);
    let mut report = BatchReport::default();

    for path in &files {
        let file_name = display_name(path);
        pb.set_message(file_name.clone());

        let processed = match fs::read(path) {
            Ok(data) => processor.process_document(&Document::new(file_name, data)),
            Err(e) => ProcessedDocument::failed(file_name, read_failure(&e)),
        };

        pb.println(document_line(&processed));
        report.push(processed);
        pb.inc(1);
    }

    pb.finish_and_clear();

    println!();
    print_table(&report.records());
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.len(),
        start.elapsed()
    );
    println!(
        "   {} OK, {} need checking, total cash out {}",
        style(report.ok_count()).green(),
        style(report.check_needed_count()).yellow(),
        report.total_outflow()
    );

    if args.no_export {
        return Ok(());
    }

    let format: ExportFormat = args.format.map(Into::into).unwrap_or(config.export.format);
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(config.export.file_name(format)));

    let exporter = format.exporter(&config.export.sheet_name);
    let bytes = exporter.serialize(&report.records())?;
    fs::write(&output_path, bytes)?;
    debug!("Wrote {} ({})", output_path.display(), exporter.mime_type());

    println!(
        "{} Spreadsheet written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn read_failure(error: &std::io::Error) -> String {
    format!("could not read file: {}", error)
}

/// Expand inputs in order, keeping only PDFs and page images.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let matches: Vec<PathBuf> = glob(input)?.filter_map(|r| r.ok()).collect();
        if matches.is_empty() {
            warn!("No files match {}", input);
        }

        for path in matches {
            if is_supported(&path) && !files.contains(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    extension == "pdf" || DocumentKind::IMAGE_EXTENSIONS.contains(&extension.as_str())
}

fn document_line(processed: &ProcessedDocument) -> String {
    let record = &processed.record;
    match (&processed.warning, record.status()) {
        (Some(warning), _) => format!(
            "{} {}: {}",
            style("⚠").yellow(),
            record.file_name(),
            warning
        ),
        (None, RecordStatus::Ok) => format!("{} {}", style("✓").green(), record.file_name()),
        (None, RecordStatus::CheckNeeded) => format!(
            "{} {} (missing: {})",
            style("?").yellow(),
            record.file_name(),
            record.missing_fields().join(", ")
        ),
    }
}

fn print_table(records: &[ExtractedRecord]) {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    for record in records {
        for (width, cell) in widths.iter_mut().zip(record.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    println!("{}", style(header.join("  ")).bold());

    for record in records {
        let row: Vec<String> = record
            .cells()
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        let line = row.join("  ");

        match record.status() {
            RecordStatus::Ok => println!("{}", line),
            RecordStatus::CheckNeeded => println!("{}", style(line).yellow()),
        }
    }
}
