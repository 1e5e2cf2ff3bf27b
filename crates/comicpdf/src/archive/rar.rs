//! CBR (RAR) backend.
//!
//! RAR archives can only be read front to back, so entries are streamed in
//! archive order and filtered on the fly.

use std::path::Path;

use unrar::Archive;

use super::PageEntry;
use crate::error::{ComicPdfError, Result};
use crate::utils::ExtensionMatcher;

fn open_error(path: &Path, err: impl std::fmt::Display) -> ComicPdfError {
    ComicPdfError::failed_to_open_archive(path.to_path_buf(), err.to_string())
}

pub(super) fn read_entries(path: &Path, matcher: &ExtensionMatcher) -> Result<Vec<PageEntry>> {
    let mut archive = Archive::new(path)
        .open_for_processing()
        .map_err(|err| open_error(path, err))?;
    let mut pages = Vec::new();

    while let Some(header) = archive.read_header().map_err(|err| open_error(path, err))? {
        let entry = header.entry();
        let name = entry.filename.to_string_lossy().replace('\\', "/");

        archive = if entry.is_file() && matcher.is_match(&name) {
            let (data, rest) = header.read().map_err(|err| open_error(path, err))?;
            pages.push(PageEntry { name, data });
            rest
        } else {
            header.skip().map_err(|err| open_error(path, err))?
        };
    }

    Ok(pages)
}

pub(super) fn list_entries(path: &Path, matcher: &ExtensionMatcher) -> Result<Vec<String>> {
    let archive = Archive::new(path)
        .open_for_listing()
        .map_err(|err| open_error(path, err))?;
    let mut names = Vec::new();

    for header in archive {
        let header = header.map_err(|err| open_error(path, err))?;
        let name = header.filename.to_string_lossy().replace('\\', "/");
        if header.is_file() && matcher.is_match(&name) {
            names.push(name);
        }
    }

    Ok(names)
}
