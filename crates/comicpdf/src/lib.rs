//! comicpdf - Convert comic archives to PDF and split PDFs to a size limit.
//!
//! This library provides:
//!
//! - Reading CBZ (ZIP) and CBR (RAR) comic archives in page order
//! - Building one-image-per-page PDFs from the archive images
//! - Splitting PDFs that exceed a byte ceiling into page-aligned parts
//! - Directory-level batches with per-file error isolation
//!
//! # Examples
//!
//! ## Convert and split a directory
//!
//! ```no_run
//! use comicpdf::batch;
//! use comicpdf::config::{Config, SizeLimit};
//!
//! # async fn example() -> comicpdf::Result<()> {
//! let config = Config::new("comics", "comics")
//!     .with_size_limit(SizeLimit::from_megabytes(200.0)?);
//!
//! let summary = batch::run_all(&config, |_| {}).await?;
//! println!(
//!     "{} archive(s) converted, {} PDF(s) checked",
//!     summary.convert.succeeded(),
//!     summary.split.total()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Split a single file
//!
//! ```no_run
//! use comicpdf::config::SizeLimit;
//! use comicpdf::split::{SplitOutcome, Splitter};
//! use std::path::Path;
//!
//! # fn example() -> comicpdf::Result<()> {
//! let limit = SizeLimit::from_megabytes(50.0)?;
//! match Splitter::new().split_file(Path::new("omnibus.pdf"), Path::new("parts"), limit)? {
//!     SplitOutcome::Split(report) => println!("{} parts", report.parts.len()),
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod output;
pub mod split;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ComicPdfError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
