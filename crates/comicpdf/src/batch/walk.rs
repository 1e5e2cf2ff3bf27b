//! Input discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::archive::ARCHIVE_EXTENSIONS;
use crate::error::{ComicPdfError, Result};
use crate::utils::ExtensionMatcher;

/// Archives (`.cbz`, `.cbr`) anywhere under `dir`, in walk order.
///
/// Directories are walked depth-first with entries sorted by file name, so
/// the order is stable across runs.
///
/// # Errors
///
/// Returns an error if `dir` is not a readable directory.
pub fn find_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let matcher = ExtensionMatcher::new(ARCHIVE_EXTENSIONS)?;
    find_matching(dir, &matcher, None)
}

/// PDFs directly inside `dir`, sorted by file name. Subdirectories are not
/// searched.
///
/// # Errors
///
/// Returns an error if `dir` is not a readable directory.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let matcher = ExtensionMatcher::new(["pdf"])?;
    find_matching(dir, &matcher, Some(1))
}

/// Check that `dir` exists and is a directory.
///
/// # Errors
///
/// Returns `FileNotFound` or `NotADirectory`.
pub fn check_input_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(ComicPdfError::file_not_found(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ComicPdfError::not_a_directory(dir.to_path_buf()));
    }
    Ok(())
}

fn find_matching(
    dir: &Path,
    matcher: &ExtensionMatcher,
    max_depth: Option<usize>,
) -> Result<Vec<PathBuf>> {
    check_input_dir(dir)?;

    let mut walker = WalkDir::new(dir).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // Unreadable subdirectories are skipped; only the root is required.
            Err(err) if err.depth() > 0 => continue,
            Err(err) => {
                return Err(ComicPdfError::FileNotAccessible {
                    path: dir.to_path_buf(),
                    source: err.into(),
                });
            }
        };

        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
