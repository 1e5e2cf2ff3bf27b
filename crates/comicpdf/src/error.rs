//! Error types for comicpdf.
//!
//! Every fallible operation in the crate returns [`ComicPdfError`]. Errors
//! carry the path they relate to so batch reports can say which file failed
//! and why.
//!
//! # Error Categories
//!
//! - **Configuration**: invalid size limit, quality, job count
//! - **Input**: missing files, unreadable archives, undecodable images
//! - **PDF**: unparsable or page-less documents
//! - **Output**: directories or files that cannot be created or written

use std::io;
use std::path::PathBuf;

/// Result type alias for comicpdf operations.
pub type Result<T> = std::result::Result<T, ComicPdfError>;

/// Main error type for comicpdf operations.
#[derive(Debug, thiserror::Error)]
pub enum ComicPdfError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Path exists but is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The archive container could not be opened or enumerated.
    #[error("Failed to open archive: {}\n  Reason: {reason}", path.display())]
    FailedToOpenArchive {
        /// Path to the archive.
        path: PathBuf,
        /// Reason reported by the archive backend.
        reason: String,
    },

    /// The file extension does not name a supported archive format.
    #[error("Unsupported archive format: {}", path.display())]
    UnsupportedArchive {
        /// Path to the archive.
        path: PathBuf,
    },

    /// The archive contains no recognized page images.
    #[error("No images found in {}", path.display())]
    NoImages {
        /// Path to the archive.
        path: PathBuf,
    },

    /// A page image could not be decoded.
    #[error("Failed to decode image '{entry}' in {}\n  Reason: {reason}", path.display())]
    ImageDecode {
        /// Archive the image came from.
        path: PathBuf,
        /// Entry name inside the archive.
        entry: String,
        /// Decoder message.
        reason: String,
    },

    /// A page image could not be re-encoded for embedding.
    #[error("Failed to encode image '{entry}'\n  Reason: {reason}")]
    ImageEncode {
        /// Entry name inside the archive.
        entry: String,
        /// Encoder message.
        reason: String,
    },

    /// Failed to load PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or has invalid structure.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output directory",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Another archive in the same batch already produces this output.
    #[error(
        "Output file {} is already produced by {}\n  Rename one of the archives to convert both",
        path.display(),
        first.display()
    )]
    DuplicateOutput {
        /// The contested output path.
        path: PathBuf,
        /// The archive that keeps the output.
        first: PathBuf,
    },

    /// Failed to create an output directory.
    #[error("Failed to create directory: {}\n  Reason: {source}", path.display())]
    FailedToCreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The size ceiling is not strictly positive.
    #[error("Invalid size limit: {value} MB. The maximum part size must be greater than 0")]
    InvalidSizeLimit {
        /// The rejected value, in megabytes.
        value: f64,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for ComicPdfError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for ComicPdfError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl ComicPdfError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: PathBuf) -> Self {
        Self::NotADirectory { path }
    }

    /// Create a FailedToOpenArchive error.
    pub fn failed_to_open_archive(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToOpenArchive {
            path,
            reason: reason.into(),
        }
    }

    /// Create a NoImages error.
    pub fn no_images(path: PathBuf) -> Self {
        Self::NoImages { path }
    }

    /// Create an ImageDecode error.
    pub fn image_decode(path: PathBuf, entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageDecode {
            path,
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::NotADirectory { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::FailedToOpenArchive { .. } => 3,
            Self::UnsupportedArchive { .. } => 3,
            Self::NoImages { .. } => 3,
            Self::ImageDecode { .. } => 3,
            Self::ImageEncode { .. } => 6,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::DuplicateOutput { .. } => 4,
            Self::FailedToCreateDir { .. } => 5,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidSizeLimit { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
