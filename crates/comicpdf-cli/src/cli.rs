//! CLI argument parsing for comicpdf.
//!
//! This module defines the command-line interface structure using `clap`.
//! Global flags apply to every subcommand; each subcommand takes the input
//! directory and the options relevant to its stage.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use comicpdf::config::{
    Config, ConvertOptions, DEFAULT_DPI, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_SIZE_MB, OverwriteMode,
    SizeLimit,
};
use comicpdf::error::{ComicPdfError, Result};

/// Convert comic archives to PDF and split oversized PDFs.
///
/// CBZ (ZIP) and CBR (RAR) archives are turned into one PDF each, one page
/// per image. PDFs larger than the maximum size are split into
/// `<name>-1.pdf`, `<name>-2.pdf`, ... along page boundaries.
#[derive(Parser, Debug)]
#[command(name = "comicpdf")]
#[command(version)]
#[command(about = "Convert CBZ/CBR comic archives to PDF and split oversized PDFs", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Dry run - report what would be done without writing any file
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Overwrite existing PDFs and split parts
    ///
    /// By default existing converted PDFs are skipped and a document whose
    /// parts already exist is reported as failed.
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Verbose output - show per-file and per-part details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Number of files processed in parallel
    ///
    /// Each job holds one whole file in memory, so peak memory grows with
    /// N times the largest archive or PDF. Default is the number of CPU
    /// cores for conversion and at most 2 for splitting. Use 1 for
    /// sequential processing.
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,

    /// Print one JSON document with per-file results instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

/// The stage to run.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert every .cbz/.cbr under INPUT_DIR into a PDF
    Convert(ConvertArgs),

    /// Split every PDF in INPUT_DIR that exceeds the maximum size
    Split(SplitArgs),

    /// Convert, then split the converted PDFs that are too large
    Run(RunArgs),
}

/// Input and output directories.
#[derive(Args, Debug)]
pub struct DirArgs {
    /// Directory to scan
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory for generated PDFs (default: INPUT_DIR)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

/// How pages are embedded.
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// JPEG quality for embedded pages (1-100)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_JPEG_QUALITY)]
    #[arg(value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Resolution used to size pages; 72 maps one pixel to one point
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DPI)]
    pub dpi: f32,
}

/// Split ceiling.
#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Maximum size of each PDF in megabytes (1 MB = 1024 x 1024 bytes)
    ///
    /// A single page larger than this still gets a part of its own.
    #[arg(short = 's', long = "max-size", value_name = "MAX_SIZE_MB")]
    #[arg(env = "COMICPDF_MAX_SIZE_MB", default_value_t = DEFAULT_MAX_SIZE_MB)]
    pub max_size_mb: f64,
}

/// Arguments of `convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    #[command(flatten)]
    pub image: ImageArgs,
}

/// Arguments of `split`.
#[derive(Args, Debug)]
pub struct SplitArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    #[command(flatten)]
    pub limit: LimitArgs,
}

/// Arguments of `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub dirs: DirArgs,

    #[command(flatten)]
    pub limit: LimitArgs,

    #[command(flatten)]
    pub image: ImageArgs,
}

impl ImageArgs {
    fn to_options(&self) -> ConvertOptions {
        ConvertOptions {
            jpeg_quality: self.quality,
            dpi: self.dpi,
        }
    }
}

impl Command {
    /// Subcommand name, as typed.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Convert(_) => "convert",
            Self::Split(_) => "split",
            Self::Run(_) => "run",
        }
    }

    fn dirs(&self) -> &DirArgs {
        match self {
            Self::Convert(args) => &args.dirs,
            Self::Split(args) => &args.dirs,
            Self::Run(args) => &args.dirs,
        }
    }

    fn image(&self) -> Option<&ImageArgs> {
        match self {
            Self::Convert(args) => Some(&args.image),
            Self::Split(_) => None,
            Self::Run(args) => Some(&args.image),
        }
    }

    fn limit(&self) -> Option<&LimitArgs> {
        match self {
            Self::Convert(_) => None,
            Self::Split(args) => Some(&args.limit),
            Self::Run(args) => Some(&args.limit),
        }
    }
}

impl Cli {
    /// The directory being scanned.
    pub fn input_dir(&self) -> &Path {
        &self.command.dirs().input_dir
    }

    /// The output directory, defaulting to the input directory.
    pub fn output_dir(&self) -> &Path {
        let dirs = self.command.dirs();
        dirs.output_dir.as_deref().unwrap_or(&dirs.input_dir)
    }

    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The maximum size is not a positive number of megabytes
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::new(self.input_dir(), self.output_dir());

        if let Some(limit) = self.command.limit() {
            config.size_limit = Some(SizeLimit::from_megabytes(limit.max_size_mb)?);
        }
        if let Some(image) = self.command.image() {
            config.convert = image.to_options();
        }

        config.overwrite_mode = if self.force {
            OverwriteMode::Force
        } else {
            OverwriteMode::NoClobber
        };
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        config.quiet = self.quiet;
        config.jobs = self.jobs;

        config.validate().map_err(|e| {
            ComicPdfError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the job count is zero.
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(ComicPdfError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        Ok(())
    }
}
