//! CBZ (ZIP) backend.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use zip::ZipArchive;

use super::PageEntry;
use crate::error::{ComicPdfError, Result};
use crate::utils::ExtensionMatcher;

fn open(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(|source| ComicPdfError::FileNotAccessible {
        path: path.to_path_buf(),
        source,
    })?;

    ZipArchive::new(BufReader::new(file))
        .map_err(|err| ComicPdfError::failed_to_open_archive(path.to_path_buf(), err.to_string()))
}

pub(super) fn read_entries(path: &Path, matcher: &ExtensionMatcher) -> Result<Vec<PageEntry>> {
    let mut archive = open(path)?;
    let mut pages = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|err| {
            ComicPdfError::failed_to_open_archive(path.to_path_buf(), err.to_string())
        })?;

        if entry.is_dir() || !matcher.is_match(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(|err| {
            ComicPdfError::failed_to_open_archive(
                path.to_path_buf(),
                format!("failed to read entry '{name}': {err}"),
            )
        })?;

        pages.push(PageEntry { name, data });
    }

    Ok(pages)
}

pub(super) fn list_entries(path: &Path, matcher: &ExtensionMatcher) -> Result<Vec<String>> {
    let archive = open(path)?;

    Ok(archive
        .file_names()
        .filter(|name| !name.ends_with('/') && matcher.is_match(name))
        .map(str::to_string)
        .collect())
}
