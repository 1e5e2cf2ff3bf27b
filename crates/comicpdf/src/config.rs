//! Configuration for conversion and splitting.
//!
//! The CLI turns its arguments into a [`Config`]; library callers can build
//! one directly. [`Config::validate`] must pass before any file is touched.

use anyhow::{Result, bail};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::ComicPdfError;

/// Bytes per megabyte used for the size ceiling.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Default ceiling for split parts, in megabytes.
pub const DEFAULT_MAX_SIZE_MB: f64 = 200.0;

/// Default JPEG quality for embedded page images.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Default page resolution; at 72 dpi one pixel maps to one point.
pub const DEFAULT_DPI: f32 = 72.0;

/// Auto-detected split concurrency never exceeds this many files.
pub const DEFAULT_SPLIT_JOBS: usize = 2;

/// A strictly positive byte ceiling for split parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SizeLimit(u64);

impl SizeLimit {
    /// Build a limit from megabytes (1 MB = 1024 × 1024 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`ComicPdfError::InvalidSizeLimit`] for zero, negative, NaN or
    /// infinite values, and for values too small to amount to a single byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicpdf::config::SizeLimit;
    ///
    /// let limit = SizeLimit::from_megabytes(200.0).unwrap();
    /// assert_eq!(limit.bytes(), 200 * 1024 * 1024);
    /// assert!(SizeLimit::from_megabytes(0.0).is_err());
    /// ```
    pub fn from_megabytes(megabytes: f64) -> crate::Result<Self> {
        if !megabytes.is_finite() || megabytes <= 0.0 {
            return Err(ComicPdfError::InvalidSizeLimit { value: megabytes });
        }

        let bytes = (megabytes * BYTES_PER_MB as f64).floor();
        if bytes < 1.0 || bytes > u64::MAX as f64 {
            return Err(ComicPdfError::InvalidSizeLimit { value: megabytes });
        }

        Ok(Self(bytes as u64))
    }

    /// Build a limit from an exact byte count.
    ///
    /// # Errors
    ///
    /// Returns [`ComicPdfError::InvalidSizeLimit`] when `bytes` is zero.
    pub fn from_bytes(bytes: u64) -> crate::Result<Self> {
        if bytes == 0 {
            return Err(ComicPdfError::InvalidSizeLimit { value: 0.0 });
        }
        Ok(Self(bytes))
    }

    /// The ceiling in bytes.
    pub fn bytes(&self) -> u64 {
        self.0
    }

    /// The ceiling in megabytes.
    pub fn megabytes(&self) -> f64 {
        self.0 as f64 / BYTES_PER_MB as f64
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self(DEFAULT_MAX_SIZE_MB as u64 * BYTES_PER_MB)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwriteMode {
    /// Never overwrite; an existing output is reported for that file.
    #[default]
    NoClobber,
    /// Always overwrite existing outputs.
    Force,
}

impl OverwriteMode {
    /// Whether existing outputs may be replaced.
    pub fn allows_overwrite(&self) -> bool {
        matches!(self, Self::Force)
    }
}

/// How page images are embedded into the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvertOptions {
    /// JPEG quality (1-100) used when re-encoding pages.
    pub jpeg_quality: u8,
    /// Resolution used to size pages; 72 gives one point per pixel.
    pub dpi: f32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            dpi: DEFAULT_DPI,
        }
    }
}

impl ConvertOptions {
    /// Validate quality and resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if quality is outside 1-100 or dpi is not positive.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            );
        }

        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            bail!("Resolution must be greater than 0 dpi, got {}", self.dpi);
        }

        Ok(())
    }
}

/// Complete configuration for a batch run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for archives (recursively) or PDFs (top level).
    pub input_dir: PathBuf,

    /// Directory receiving converted PDFs and split parts.
    pub output_dir: PathBuf,

    /// Ceiling for split parts. Required for splitting.
    pub size_limit: Option<SizeLimit>,

    /// Page embedding options.
    pub convert: ConvertOptions,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Dry run mode - report what would happen without writing.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Number of files processed concurrently (None = auto-detect).
    ///
    /// Each in-flight file is held in memory whole: a convert job keeps the
    /// archive's pages, a split job keeps the source document plus a
    /// serialized candidate part.
    pub jobs: Option<usize>,
}

impl Config {
    /// Create a configuration with defaults for everything but the directories.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            size_limit: None,
            convert: ConvertOptions::default(),
            overwrite_mode: OverwriteMode::default(),
            dry_run: false,
            verbose: false,
            quiet: false,
            jobs: None,
        }
    }

    /// Set the split ceiling.
    pub fn with_size_limit(mut self, limit: SizeLimit) -> Self {
        self.size_limit = Some(limit);
        self
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies only; no filesystem access.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - Conversion options are out of range
    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            bail!("No input directory specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        self.convert.validate()?;

        Ok(())
    }

    /// The split ceiling, or a configuration error when none was given.
    pub fn require_size_limit(&self) -> crate::Result<SizeLimit> {
        self.size_limit
            .ok_or_else(|| ComicPdfError::invalid_config("A maximum part size is required"))
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Parallel jobs for the split stage.
    ///
    /// An explicit job count is used as is. Auto-detect is capped at
    /// [`DEFAULT_SPLIT_JOBS`], since every split job loads a whole PDF.
    pub fn effective_split_jobs(&self) -> usize {
        match self.jobs {
            Some(jobs) => jobs,
            None => self.effective_jobs().min(DEFAULT_SPLIT_JOBS),
        }
    }
}
