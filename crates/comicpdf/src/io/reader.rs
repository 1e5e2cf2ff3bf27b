//! PDF loading.
//!
//! # Examples
//!
//! ```no_run
//! use comicpdf::io::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> comicpdf::Result<()> {
//! let loaded = PdfReader::new().load(Path::new("issue-01.pdf"))?;
//! println!("{} pages, {} bytes", loaded.page_count, loaded.file_size);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{ComicPdfError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts page-less documents.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Check that `path` exists and is a regular file.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound`, `NotAFile` or `FileNotAccessible`.
    pub fn check_path_exists(path: &Path) -> Result<()> {
        let exists = path
            .try_exists()
            .map_err(|source| ComicPdfError::FileNotAccessible {
                path: path.to_path_buf(),
                source,
            })?;
        if !exists {
            return Err(ComicPdfError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(ComicPdfError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }

    /// Size of a file on disk.
    pub fn file_size(path: &Path) -> Result<u64> {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|source| ComicPdfError::FileNotAccessible {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be found or read
    /// - File is not a valid PDF
    /// - The document has no pages (unless verification is disabled)
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        Self::check_path_exists(path)?;
        let file_size = Self::file_size(path)?;

        let document = Document::load(path)
            .map_err(|e| ComicPdfError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;

        let page_count = document.get_pages().len();
        if self.verify && page_count == 0 {
            return Err(ComicPdfError::corrupted_pdf(
                path.to_path_buf(),
                "PDF has no pages",
            ));
        }

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            file_size,
        })
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
