//! Models command - download and manage OCR models.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

use talipapa_core::TalipapaConfig;

use super::{load_config, model_dir};

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// Download the OCR model files
    Download(DownloadArgs),

    /// Check which model files are present
    Status,

    /// Remove downloaded model files
    Clean,
}

#[derive(Args)]
struct DownloadArgs {
    /// Base URL to download from (default: models.download_base_url, the public PP-OCR mobile models)
    #[arg(long)]
    base_url: Option<String>,

    /// Output directory (default: models.model_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force re-download even if files exist
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ModelsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        ModelsCommand::Download(download_args) => download_models(&config, download_args).await,
        ModelsCommand::Status => check_status(&config, &model_dir(&config)),
        ModelsCommand::Clean => clean_models(&config),
    }
}

async fn download_models(config: &TalipapaConfig, args: DownloadArgs) -> anyhow::Result<()> {
    let mut models = config.models.clone();
    if let Some(base_url) = args.base_url {
        models.download_base_url = base_url;
    }
    if models.download_base_url.trim().is_empty() {
        anyhow::bail!(
            "No download URL configured. Pass --base-url, run \
             'talipapa config set models.download_base_url <url>', or copy {} into the model directory by hand.",
            models.files().join(", ")
        );
    }

    let output_dir = args.output.unwrap_or_else(|| model_dir(config));
    fs::create_dir_all(&output_dir)?;

    println!(
        "{} Downloading OCR models to {}",
        style("ℹ").blue(),
        output_dir.display()
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("talipapa-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let mut failed = Vec::new();

    for filename in models.files() {
        let path = output_dir.join(filename);

        if path.exists() && !args.force {
            println!("  {} {} (already exists)", style("✓").green(), filename);
            continue;
        }

        let Some(url) = models.file_url(filename) else {
            continue;
        };

        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} {msg:<24} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")?
                .progress_chars("=>-"),
        );
        pb.set_message(filename.to_string());

        match download_file(&client, &url, &path, &pb).await {
            Ok(()) => {
                pb.finish_with_message(format!("{} {}", style("✓").green(), filename));
            }
            Err(e) => {
                pb.finish_with_message(format!("{} {} - {}", style("✗").red(), filename, e));
                failed.push(filename);
            }
        }
    }

    println!();
    if failed.is_empty() {
        println!("{} OCR models ready", style("✓").green().bold());
        Ok(())
    } else {
        anyhow::bail!(
            "Failed to download {}. Retry with --force.",
            failed.join(", ")
        )
    }
}

async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    if let Some(content_length) = response.content_length() {
        pb.set_length(content_length);
    }

    // Stream into a temp file, rename once complete
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

fn check_status(config: &TalipapaConfig, dir: &Path) -> anyhow::Result<()> {
    println!("{}", style("Model Status").bold());
    println!("Directory: {}", dir.display());
    println!();

    for filename in config.models.files() {
        let path = dir.join(filename);
        if path.is_file() {
            let size = fs::metadata(&path)?.len();
            println!("    {} {:<25} {:>10}", style("✓").green(), filename, format_size(size));
        } else {
            println!("    {} {:<25} {:>10}", style("✗").red(), filename, "missing");
        }
    }

    println!();
    if config.models.is_complete(dir) {
        println!("    {} Ready", style("✓").green());
    } else {
        println!(
            "    {} Run 'talipapa models download' to fetch missing files",
            style("⚠").yellow()
        );
    }

    Ok(())
}

fn clean_models(config: &TalipapaConfig) -> anyhow::Result<()> {
    let dir = model_dir(config);
    let mut removed = 0;
    let mut freed: u64 = 0;

    for filename in config.models.files() {
        let path = dir.join(filename);
        if path.is_file() {
            freed += fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            fs::remove_file(&path)?;
            removed += 1;
            println!("  {} Removed {}", style("✓").green(), filename);
        }
    }

    // Leftovers from interrupted downloads
    if let Ok(entries) = fs::read_dir(&dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "tmp") {
                let _ = fs::remove_file(&path);
            }
        }
    }

    if removed > 0 {
        println!(
            "{} Removed {} files, freed {}",
            style("✓").green(),
            removed,
            format_size(freed)
        );
    } else {
        println!("{} No model files to remove.", style("ℹ").blue());
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(4_500_000), "4.5MB");
    }
}
