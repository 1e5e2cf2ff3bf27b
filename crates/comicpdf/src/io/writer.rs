//! PDF serialization and saving.
//!
//! Documents can be serialized to memory (to measure them) or saved to a
//! file. Saves are atomic: the bytes go to a sibling temporary
//! file which is renamed over the destination once flushed. Every save gets
//! its own temporary name, so concurrent saves never share one.

use lopdf::Document;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::{ComicPdfError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Flate-compress unfiltered streams before writing.
    pub compress: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compress: true,
            buffer_size: 64 * 1024,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer that leaves streams exactly as they are.
    pub fn without_compression() -> Self {
        Self {
            options: WriteOptions {
                compress: false,
                ..Default::default()
            },
        }
    }

    /// Serialize a document into memory.
    ///
    /// The returned buffer is exactly what [`PdfWriter::save`] would write.
    ///
    /// # Errors
    ///
    /// Returns an error if lopdf fails to serialize the document.
    pub fn serialize(&self, doc: &mut Document) -> Result<Vec<u8>> {
        if self.options.compress {
            doc.compress();
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| ComicPdfError::other(format!("Failed to serialize PDF: {e}")))?;
        Ok(buffer)
    }

    /// Serialize and save a document, returning write statistics.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created, or the
    /// write fails.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let bytes = self.serialize(doc)?;
        self.write_bytes(&bytes, path)?;

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size: bytes.len() as u64,
            output_path: path.to_path_buf(),
        })
    }

    /// Write already-serialized PDF bytes to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created, or the
    /// write fails.
    pub fn write_bytes(&self, bytes: &[u8], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            ensure_dir(parent)?;
        }

        let temp_path = temp_path_for(path);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(|e| ComicPdfError::FailedToCreateOutput {
                path: temp_path.clone(),
                source: e,
            })?;

        let renamed = self
            .write_all_to(file, bytes, &temp_path)
            .and_then(|()| {
                std::fs::rename(&temp_path, path).map_err(|e| ComicPdfError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })
            });
        if renamed.is_err() {
            let _ = std::fs::remove_file(&temp_path);
        }
        renamed
    }

    fn write_all_to(&self, file: File, bytes: &[u8], path: &Path) -> Result<()> {
        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);
        writer
            .write_all(bytes)
            .and_then(|_| writer.flush())
            .map_err(|e| ComicPdfError::FailedToWrite {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

/// Create `dir` and its parents if missing.
///
/// # Errors
///
/// Returns `FailedToCreateDir` if creation fails, or `NotADirectory` if the
/// path exists as something else.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(ComicPdfError::not_a_directory(dir.to_path_buf()));
    }

    std::fs::create_dir_all(dir).map_err(|source| ComicPdfError::FailedToCreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Sibling temporary path for one save of `path`, unique within the machine.
fn temp_path_for(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);

    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    path.with_file_name(name)
}
