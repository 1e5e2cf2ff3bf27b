//! comicpdf - Convert comic archives to PDF and split oversized PDFs.

mod cli;
mod json;

use clap::Parser;
use serde::Serialize;
use std::process;

use crate::cli::{Cli, Command};
use crate::json::{CommandJson, ErrorJson};
use comicpdf::batch::{self, BatchProgress};
use comicpdf::config::Config;
use comicpdf::error::ComicPdfError;
use comicpdf::output::{
    OutputFormatter, display_convert_summary, display_progress, display_split_summary,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(true) => {}
        // Per-file failures were already reported in the summary.
        Ok(false) => process::exit(1),
        Err(err) => {
            if json {
                let _ = print_json(&ErrorJson::new(&err));
            } else {
                eprintln!("Error: {err}");
            }
            process::exit(err.exit_code());
        }
    }
}

/// Main application logic.
///
/// Returns whether every file was processed without error.
async fn run(cli: Cli) -> Result<bool, ComicPdfError> {
    cli.validate()?;
    let config = cli.to_config()?;

    let formatter = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    print_header(&formatter, &cli, &config);

    let on_progress = |progress: BatchProgress| display_progress(&formatter, &progress);

    let all_ok = match &cli.command {
        Command::Convert(_) => {
            let summary = batch::convert_all(&config, on_progress).await?;
            if cli.json {
                print_json(&CommandJson::convert(&summary, config.dry_run))?;
            } else {
                display_convert_summary(&formatter, &summary);
            }
            !summary.has_failures()
        }
        Command::Split(_) => {
            let summary = batch::split_all(&config, on_progress).await?;
            if cli.json {
                print_json(&CommandJson::split(&summary, config.dry_run))?;
            } else {
                display_split_summary(&formatter, &summary);
            }
            !summary.has_failures()
        }
        Command::Run(_) => {
            let summary = batch::run_all(&config, on_progress).await?;
            if cli.json {
                print_json(&CommandJson::run(&summary, config.dry_run))?;
            } else {
                display_convert_summary(&formatter, &summary.convert);
                display_split_summary(&formatter, &summary.split);
            }
            !summary.has_failures()
        }
    };

    if config.dry_run && !cli.json {
        formatter.blank_line();
        formatter.success("Dry run completed, nothing was written");
        formatter.info("  Run without --dry-run to write the PDFs");
    }

    Ok(all_ok)
}

fn print_header(formatter: &OutputFormatter, cli: &Cli, config: &Config) {
    if !formatter.should_print() {
        return;
    }

    formatter.section(&format!("{} v{}", comicpdf::NAME, comicpdf::VERSION));
    formatter.info(&format!(
        "{} {} -> {}",
        cli.command.name(),
        config.input_dir.display(),
        config.output_dir.display()
    ));
    if let Some(limit) = config.size_limit {
        formatter.detail("Maximum size", &format!("{:.2} MB", limit.megabytes()));
    }
    formatter.detail("Jobs", &config.effective_jobs().to_string());
    formatter.blank_line();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ComicPdfError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| ComicPdfError::other(format!("Failed to encode JSON: {err}")))?;
    println!("{text}");
    Ok(())
}
