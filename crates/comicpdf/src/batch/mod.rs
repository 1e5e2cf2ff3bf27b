//! Directory-level conversion and splitting.
//!
//! Batches run one blocking per-file operation per input on the tokio
//! blocking pool, with at most `jobs` in flight. A failing file is recorded
//! in its [`FileReport`] and the batch carries on; only configuration and
//! input-directory problems abort a batch.
//!
//! # Examples
//!
//! ```no_run
//! use comicpdf::batch;
//! use comicpdf::config::{Config, SizeLimit};
//!
//! # async fn example() -> comicpdf::Result<()> {
//! let config = Config::new("comics", "comics")
//!     .with_size_limit(SizeLimit::from_megabytes(200.0)?);
//!
//! let summary = batch::run_all(&config, |p| {
//!     println!("[{}/{}] {}", p.completed, p.total, p.path.display());
//! })
//! .await?;
//! println!("{} converted, {} failed", summary.convert.succeeded(), summary.convert.failed());
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod split;
pub mod walk;

pub use convert::{
    ConvertOutcome, Converter, SkipReason, convert_all, output_path_for, shadowed_archives,
};
pub use split::split_all;
pub use walk::{check_input_dir, find_archives, find_pdfs};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{ComicPdfError, Result};
use crate::split::SplitOutcome;

/// Which pass a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStage {
    /// Archive to PDF conversion.
    Convert,
    /// Size-constrained splitting.
    Split,
}

/// Emitted once per finished file, in completion order.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Current pass.
    pub stage: BatchStage,
    /// Files finished so far, including this one.
    pub completed: usize,
    /// Files in the batch.
    pub total: usize,
    /// The file that just finished.
    pub path: PathBuf,
    /// Whether it finished without error.
    pub succeeded: bool,
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct FileReport<T> {
    /// The input file.
    pub path: PathBuf,
    /// What happened to it.
    pub result: Result<T>,
}

impl<T> FileReport<T> {
    /// Whether the file was processed without error.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The error, if the file failed.
    pub fn error(&self) -> Option<&ComicPdfError> {
        self.result.as_ref().err()
    }
}

/// Reports for every input of a batch, in input order.
#[derive(Debug)]
pub struct BatchSummary<T> {
    /// One report per input file.
    pub reports: Vec<FileReport<T>>,
    /// Wall time of the batch.
    pub elapsed: Duration,
}

impl<T> BatchSummary<T> {
    /// An empty summary.
    pub fn empty() -> Self {
        Self {
            reports: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Number of input files.
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Files processed without error.
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.is_ok()).count()
    }

    /// Files that failed.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Whether any file failed.
    pub fn has_failures(&self) -> bool {
        self.reports.iter().any(|r| !r.is_ok())
    }

    /// Failed files with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ComicPdfError)> {
        self.reports
            .iter()
            .filter_map(|r| r.error().map(|e| (r.path.as_path(), e)))
    }

    /// Successful outcomes with their inputs.
    pub fn outcomes(&self) -> impl Iterator<Item = (&Path, &T)> {
        self.reports
            .iter()
            .filter_map(|r| r.result.as_ref().ok().map(|o| (r.path.as_path(), o)))
    }
}

/// Summaries of a convert pass followed by a split pass.
#[derive(Debug)]
pub struct RunSummary {
    /// The conversion pass.
    pub convert: BatchSummary<ConvertOutcome>,
    /// The split pass over the conversion output directory.
    pub split: BatchSummary<SplitOutcome>,
}

impl RunSummary {
    /// Whether any file in either pass failed.
    pub fn has_failures(&self) -> bool {
        self.convert.has_failures() || self.split.has_failures()
    }
}

/// Convert every archive, then split every oversized PDF in the output
/// directory.
///
/// # Errors
///
/// Returns an error for invalid configuration (including a missing size
/// limit) or an unusable input or output directory. Per-file failures are
/// in the summaries.
pub async fn run_all<P>(config: &Config, mut on_progress: P) -> Result<RunSummary>
where
    P: FnMut(BatchProgress),
{
    config.require_size_limit()?;

    let convert = convert_all(config, &mut on_progress).await?;

    let mut split_config = config.clone();
    split_config.input_dir = config.output_dir.clone();
    let split = if split_config.input_dir.is_dir() {
        split_all(&split_config, &mut on_progress).await?
    } else {
        // Dry runs never create the output directory.
        BatchSummary::empty()
    };

    Ok(RunSummary { convert, split })
}

/// Run `op` over `paths` with at most `jobs` files in flight.
///
/// Reports come back in input order; `on_progress` sees files in
/// completion order.
pub(crate) async fn run_batch<T, F, P>(
    paths: Vec<PathBuf>,
    jobs: usize,
    stage: BatchStage,
    op: F,
    mut on_progress: P,
) -> BatchSummary<T>
where
    T: Send + 'static,
    F: Fn(&Path) -> Result<T> + Send + Sync + 'static,
    P: FnMut(BatchProgress),
{
    let start = Instant::now();
    let total = paths.len();
    let op = Arc::new(op);

    let tasks = paths.into_iter().enumerate().map(|(idx, path)| {
        let op = Arc::clone(&op);
        async move {
            let task_path = path.clone();
            let result = tokio::task::spawn_blocking(move || op(&task_path))
                .await
                .unwrap_or_else(|e| Err(ComicPdfError::other(format!("Worker task failed: {e}"))));
            (idx, FileReport { path, result })
        }
    });

    let mut pending = stream::iter(tasks).buffer_unordered(jobs.max(1));
    let mut indexed = Vec::with_capacity(total);

    while let Some((idx, report)) = pending.next().await {
        on_progress(BatchProgress {
            stage,
            completed: indexed.len() + 1,
            total,
            path: report.path.clone(),
            succeeded: report.is_ok(),
        });
        indexed.push((idx, report));
    }

    // Sort by original index to maintain order
    indexed.sort_by_key(|(idx, _)| *idx);

    BatchSummary {
        reports: indexed.into_iter().map(|(_, report)| report).collect(),
        elapsed: start.elapsed(),
    }
}
