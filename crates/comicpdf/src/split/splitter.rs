//! Size-constrained splitting of one PDF file.
//!
//! The source is loaded once. Each candidate part is extracted and
//! serialized into memory; the buffer length is the measured size, and only
//! accepted buffers are written, so a rejected candidate never reaches the
//! disk.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::pages::PageExtractor;
use super::plan::{AcceptedPart, PageSpan, SplitEstimate, split_pages};
use crate::config::{OverwriteMode, SizeLimit};
use crate::error::{ComicPdfError, Result};
use crate::io::{PdfReader, PdfWriter, ensure_dir};
use crate::utils::{file_stem, format_file_size};

/// One written part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartInfo {
    /// 1-based part index.
    pub index: usize,
    /// Where the part was written.
    pub path: PathBuf,
    /// 1-based number of the first source page in the part.
    pub first_page: usize,
    /// 1-based number of the last source page in the part.
    pub last_page: usize,
    /// Size of the part file in bytes.
    pub bytes: u64,
    /// Serializations tried before the part was accepted.
    pub attempts: usize,
    /// Single page that exceeds the ceiling on its own.
    pub oversized: bool,
}

impl PartInfo {
    /// Number of pages in the part.
    pub fn page_count(&self) -> usize {
        self.last_page + 1 - self.first_page
    }

    /// Format the part size as a human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.bytes)
    }
}

/// Result of splitting one oversized document.
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    /// The split document.
    pub source: PathBuf,
    /// Pages in the source.
    pub total_pages: usize,
    /// Source size on disk in bytes.
    pub original_size: u64,
    /// Ceiling in bytes.
    pub limit: u64,
    /// Up-front estimate that drove the split.
    pub estimate: SplitEstimate,
    /// Parts in page order.
    pub parts: Vec<PartInfo>,
}

impl SplitReport {
    /// Total serializations across all parts.
    pub fn total_attempts(&self) -> usize {
        self.parts.iter().map(|p| p.attempts).sum()
    }

    /// Parts that exceed the ceiling because a single page does.
    pub fn oversized_parts(&self) -> impl Iterator<Item = &PartInfo> {
        self.parts.iter().filter(|p| p.oversized)
    }
}

/// What [`Splitter::split_file`] did with a document.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SplitOutcome {
    /// The source is at or under the ceiling and was left alone.
    WithinLimit {
        /// Source size on disk in bytes.
        size: u64,
        /// Ceiling in bytes.
        limit: u64,
    },
    /// The source was split into parts.
    Split(SplitReport),
    /// Dry run: the source would be split according to `estimate`.
    DryRun {
        /// Pages in the source.
        total_pages: usize,
        /// Source size on disk in bytes.
        original_size: u64,
        /// The estimate the split would start from.
        estimate: SplitEstimate,
    },
}

/// File name of part `index` of a document with stem `stem`.
///
/// ```
/// assert_eq!(comicpdf::split::part_file_name("Vol 1", 3), "Vol 1-3.pdf");
/// ```
pub fn part_file_name(stem: &str, index: usize) -> String {
    format!("{stem}-{index}.pdf")
}

/// Whether `name` is a part file name for `stem`.
pub fn is_part_file_name(name: &str, stem: &str) -> bool {
    name.strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| rest.strip_suffix(".pdf"))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

/// Splits PDFs that exceed a size ceiling.
#[derive(Debug, Clone)]
pub struct Splitter {
    reader: PdfReader,
    writer: PdfWriter,
    overwrite: OverwriteMode,
    dry_run: bool,
}

impl Splitter {
    /// Create a splitter that refuses to overwrite existing parts.
    pub fn new() -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::without_compression(),
            overwrite: OverwriteMode::default(),
            dry_run: false,
        }
    }

    /// Set the overwrite behavior for existing part files.
    pub fn with_overwrite(mut self, overwrite: OverwriteMode) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Only report the estimate; write nothing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Split `source` into parts under `limit`, written to `dest_dir`.
    ///
    /// A source at or under the limit is left alone. Otherwise parts are
    /// named `<stem>-<n>.pdf`, numbered from 1, and cover every page exactly
    /// once. A part exceeds the limit only when it is a single page that
    /// does on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or not a valid PDF, if
    /// parts from an earlier split exist and overwriting is not allowed, or
    /// if the destination cannot be created or written.
    pub fn split_file(
        &self,
        source: &Path,
        dest_dir: &Path,
        limit: SizeLimit,
    ) -> Result<SplitOutcome> {
        PdfReader::check_path_exists(source)?;
        let original_size = PdfReader::file_size(source)?;
        let ceiling = limit.bytes();

        if original_size <= ceiling {
            return Ok(SplitOutcome::WithinLimit {
                size: original_size,
                limit: ceiling,
            });
        }

        let loaded = self.reader.load(source)?;
        let total_pages = loaded.page_count;
        let estimate = SplitEstimate::new(original_size, total_pages, ceiling);

        if self.dry_run {
            return Ok(SplitOutcome::DryRun {
                total_pages,
                original_size,
                estimate,
            });
        }

        let stem = file_stem(source);
        if !self.overwrite.allows_overwrite()
            && let Some(existing) = find_existing_part(dest_dir, &stem)?
        {
            return Err(ComicPdfError::output_exists(existing));
        }

        ensure_dir(dest_dir)?;

        let extractor = PageExtractor::new(&loaded.document)?;
        let mut parts = Vec::with_capacity(estimate.num_parts.min(total_pages));

        split_pages(
            total_pages,
            estimate,
            ceiling,
            |span: PageSpan| {
                let mut part = extractor.extract(span)?;
                self.writer.serialize(&mut part)
            },
            |index, part: AcceptedPart<Vec<u8>>| {
                let path = dest_dir.join(part_file_name(&stem, index));
                self.writer.write_bytes(&part.rendered, &path)?;
                parts.push(PartInfo {
                    index,
                    path,
                    first_page: part.span.first_page(),
                    last_page: part.span.last_page(),
                    bytes: part.byte_size(),
                    attempts: part.attempts,
                    oversized: part.oversized,
                });
                Ok(())
            },
        )?;

        Ok(SplitOutcome::Split(SplitReport {
            source: source.to_path_buf(),
            total_pages,
            original_size,
            limit: ceiling,
            estimate,
            parts,
        }))
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}

/// First existing part file for `stem` in `dir`, by name.
fn find_existing_part(dir: &Path, stem: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut existing: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| is_part_file_name(name, stem))
        })
        .map(|entry| entry.path())
        .collect();

    existing.sort();
    Ok(existing.into_iter().next())
}
