//! Comic archive reading.
//!
//! A comic archive is a ZIP (`.cbz`) or RAR (`.cbr`) container of page
//! images. [`read_pages`] opens either kind, keeps the entries whose names
//! end in a recognized image extension and returns them sorted by name,
//! which is the page order.
//!
//! # Examples
//!
//! ```no_run
//! use comicpdf::archive;
//! use std::path::Path;
//!
//! # fn example() -> comicpdf::Result<()> {
//! let pages = archive::read_pages(Path::new("issue-01.cbz"))?;
//! for page in &pages {
//!     println!("{} ({} bytes)", page.name, page.data.len());
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "rar")]
mod rar;
mod zip;

use serde::Serialize;
use std::path::Path;

use crate::error::{ComicPdfError, Result};
use crate::utils::ExtensionMatcher;

/// Archive file extensions handled by the converter.
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["cbz", "cbr"];

/// Entry extensions treated as page images.
pub const PAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Container format of a comic archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    /// ZIP container (`.cbz`).
    Zip,
    /// RAR container (`.cbr`).
    Rar,
}

impl ArchiveKind {
    /// Detect the container format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("cbz") {
            Some(Self::Zip)
        } else if ext.eq_ignore_ascii_case("cbr") {
            Some(Self::Rar)
        } else {
            None
        }
    }
}

/// One page image entry, still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Entry name inside the archive.
    pub name: String,
    /// Raw encoded image bytes.
    pub data: Vec<u8>,
}

/// Read all page images of an archive in page order.
///
/// # Errors
///
/// Returns an error if the file is missing, its extension is not a known
/// archive kind, or the container cannot be read. An archive without
/// images is *not* an error here; callers decide how to report it.
pub fn read_pages(path: &Path) -> Result<Vec<PageEntry>> {
    check_archive_path(path)?;
    let kind = ArchiveKind::from_path(path)
        .ok_or_else(|| ComicPdfError::UnsupportedArchive {
            path: path.to_path_buf(),
        })?;

    let matcher = page_matcher()?;
    let mut pages = match kind {
        ArchiveKind::Zip => zip::read_entries(path, &matcher)?,
        ArchiveKind::Rar => read_rar_entries(path, &matcher)?,
    };

    sort_pages(&mut pages);
    Ok(pages)
}

/// List page image names in page order without reading their data.
///
/// # Errors
///
/// Same conditions as [`read_pages`].
pub fn list_pages(path: &Path) -> Result<Vec<String>> {
    check_archive_path(path)?;
    let kind = ArchiveKind::from_path(path)
        .ok_or_else(|| ComicPdfError::UnsupportedArchive {
            path: path.to_path_buf(),
        })?;

    let matcher = page_matcher()?;
    let mut names = match kind {
        ArchiveKind::Zip => zip::list_entries(path, &matcher)?,
        ArchiveKind::Rar => list_rar_entries(path, &matcher)?,
    };

    names.sort();
    Ok(names)
}

/// Matcher for page image entry names.
pub fn page_matcher() -> Result<ExtensionMatcher> {
    ExtensionMatcher::new(PAGE_EXTENSIONS)
}

/// Sort pages lexicographically by entry name.
pub fn sort_pages(pages: &mut [PageEntry]) {
    pages.sort_by(|a, b| a.name.cmp(&b.name));
}

fn check_archive_path(path: &Path) -> Result<()> {
    let exists = path.try_exists().map_err(|source| ComicPdfError::FileNotAccessible {
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

#[cfg(feature = "rar")]
fn read_rar_entries(path: &Path, matcher: &ExtensionMatcher) -> Result<Vec<PageEntry>> {
    rar::read_entries(path, matcher)
}

#[cfg(not(feature = "rar"))]
fn read_rar_entries(path: &Path, _matcher: &ExtensionMatcher) -> Result<Vec<PageEntry>> {
    Err(ComicPdfError::UnsupportedArchive {
        path: path.to_path_buf(),
    })
}

#[cfg(feature = "rar")]
fn list_rar_entries(path: &Path, matcher: &ExtensionMatcher) -> Result<Vec<String>> {
    rar::list_entries(path, matcher)
}

#[cfg(not(feature = "rar"))]
fn list_rar_entries(path: &Path, _matcher: &ExtensionMatcher) -> Result<Vec<String>> {
    Err(ComicPdfError::UnsupportedArchive {
        path: path.to_path_buf(),
    })
}
