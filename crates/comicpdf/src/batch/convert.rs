//! Archive to PDF conversion, per file and per directory.

use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};

use super::walk::{check_input_dir, find_archives};
use super::{BatchProgress, BatchStage, BatchSummary, run_batch};
use crate::archive;
use crate::config::{Config, ConvertOptions, OverwriteMode};
use crate::document::DocumentBuilder;
use crate::error::{ComicPdfError, Result};
use crate::io::ensure_dir;
use crate::utils::file_stem;

/// Why an archive produced no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The archive holds no recognized page images.
    NoImages,
    /// The output PDF exists and overwriting is off.
    OutputExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImages => f.write_str("no images found"),
            Self::OutputExists => f.write_str("output already exists"),
        }
    }
}

/// What happened to one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvertOutcome {
    /// A PDF was written.
    Created {
        /// The written PDF.
        output: PathBuf,
        /// Pages in the PDF.
        pages: usize,
        /// PDF size in bytes.
        bytes: u64,
    },
    /// No PDF was written.
    Skipped {
        /// Where the PDF would have gone.
        output: PathBuf,
        /// Why it was skipped.
        reason: SkipReason,
    },
    /// Dry run: a PDF with `pages` pages would be written.
    DryRun {
        /// Where the PDF would go.
        output: PathBuf,
        /// Pages it would have.
        pages: usize,
    },
}

impl ConvertOutcome {
    /// The output path, written or not.
    pub fn output(&self) -> &Path {
        match self {
            Self::Created { output, .. }
            | Self::Skipped { output, .. }
            | Self::DryRun { output, .. } => output,
        }
    }
}

/// Output PDF path for an archive: `<output_dir>/<archive-stem>.pdf`.
pub fn output_path_for(archive: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.pdf", file_stem(archive)))
}

/// Archives whose output an earlier archive in `archives` already claims,
/// each mapped to that earlier archive.
///
/// Archives are flattened into one directory, so `a/vol1.cbz` and
/// `b/vol1.cbz` both want `vol1.pdf`. The first one in walk order keeps it.
pub fn shadowed_archives(archives: &[PathBuf], output_dir: &Path) -> HashMap<PathBuf, PathBuf> {
    let mut owners: HashMap<PathBuf, &PathBuf> = HashMap::new();
    let mut shadowed = HashMap::new();

    for archive in archives {
        match owners.entry(output_path_for(archive, output_dir)) {
            Entry::Occupied(owner) => {
                shadowed.insert(archive.clone(), (*owner.get()).clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(archive);
            }
        }
    }

    shadowed
}

/// Converts single archives to PDFs.
#[derive(Debug, Clone)]
pub struct Converter {
    builder: DocumentBuilder,
    overwrite: OverwriteMode,
    dry_run: bool,
}

impl Converter {
    /// Create a converter with the given embedding options.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            builder: DocumentBuilder::new(options),
            overwrite: OverwriteMode::default(),
            dry_run: false,
        }
    }

    /// Create a converter from a batch configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.convert)
            .with_overwrite(config.overwrite_mode)
            .with_dry_run(config.dry_run)
    }

    /// Set the overwrite behavior for existing PDFs.
    pub fn with_overwrite(mut self, overwrite: OverwriteMode) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Only count pages; write nothing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Convert one archive into `<output_dir>/<stem>.pdf`.
    ///
    /// Archives without page images and archives whose output already
    /// exists (unless overwriting) are skipped, not failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read, a page cannot be
    /// decoded, or the PDF cannot be written.
    pub fn convert_file(&self, archive: &Path, output_dir: &Path) -> Result<ConvertOutcome> {
        let output = output_path_for(archive, output_dir);

        if self.dry_run {
            let names = archive::list_pages(archive)?;
            if names.is_empty() {
                return Ok(ConvertOutcome::Skipped {
                    output,
                    reason: SkipReason::NoImages,
                });
            }
            return Ok(ConvertOutcome::DryRun {
                output,
                pages: names.len(),
            });
        }

        if output.exists() && !self.overwrite.allows_overwrite() {
            return Ok(ConvertOutcome::Skipped {
                output,
                reason: SkipReason::OutputExists,
            });
        }

        let pages = archive::read_pages(archive)?;
        if pages.is_empty() {
            return Ok(ConvertOutcome::Skipped {
                output,
                reason: SkipReason::NoImages,
            });
        }

        let stats = self.builder.build_to_file(archive, &pages, &output)?;

        Ok(ConvertOutcome::Created {
            output,
            pages: pages.len(),
            bytes: stats.file_size,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

/// Convert every archive under `config.input_dir`.
///
/// Archives are found recursively; all PDFs go flat into
/// `config.output_dir`, which is created unless this is a dry run. When
/// several archives share a stem, only the first in walk order is
/// converted; the others fail with `DuplicateOutput`, even with `--force`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input directory
/// is unusable, or the output directory cannot be created.
pub async fn convert_all<P>(config: &Config, on_progress: P) -> Result<BatchSummary<ConvertOutcome>>
where
    P: FnMut(BatchProgress),
{
    config.validate()?;
    check_input_dir(&config.input_dir)?;

    let archives = find_archives(&config.input_dir)?;
    if !config.dry_run {
        ensure_dir(&config.output_dir)?;
    }

    let shadowed = shadowed_archives(&archives, &config.output_dir);
    let converter = Converter::from_config(config);
    let output_dir = config.output_dir.clone();

    Ok(run_batch(
        archives,
        config.effective_jobs(),
        BatchStage::Convert,
        move |path| match shadowed.get(path) {
            Some(first) => Err(ComicPdfError::DuplicateOutput {
                path: output_path_for(path, &output_dir),
                first: first.clone(),
            }),
            None => converter.convert_file(path, &output_dir),
        },
        on_progress,
    )
    .await)
}
