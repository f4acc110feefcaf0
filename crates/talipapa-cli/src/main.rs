//! CLI application for Talipapa cash invoice extraction.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, models, process};

/// Talipapa cash invoice extractor - Pull date, bill number, amount and remarks from scanned slips
#[derive(Parser)]
#[command(name = "talipapa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single scanned slip
    Process(process::ProcessArgs),

    /// Process a batch of slips and export a spreadsheet
    Batch(batch::BatchArgs),

    /// Manage OCR models
    Models(models::ModelsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Models(args) => models::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
