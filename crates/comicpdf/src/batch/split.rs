//! Splitting every oversized PDF in a directory.

use super::walk::{check_input_dir, find_pdfs};
use super::{BatchProgress, BatchStage, BatchSummary, run_batch};
use crate::config::Config;
use crate::error::Result;
use crate::split::{SplitOutcome, Splitter};

/// Split the PDFs directly inside `config.input_dir` that exceed the
/// configured size limit, writing parts to `config.output_dir`.
///
/// The file list is taken before any part is written, so parts produced
/// by this batch are never split again within it.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or has no size limit,
/// or the input directory is unusable. Per-file failures are in the
/// summary.
pub async fn split_all<P>(config: &Config, on_progress: P) -> Result<BatchSummary<SplitOutcome>>
where
    P: FnMut(BatchProgress),
{
    config.validate()?;
    let limit = config.require_size_limit()?;
    check_input_dir(&config.input_dir)?;

    let pdfs = find_pdfs(&config.input_dir)?;

    let splitter = Splitter::new()
        .with_overwrite(config.overwrite_mode)
        .with_dry_run(config.dry_run);
    let dest_dir = config.output_dir.clone();

    Ok(run_batch(
        pdfs,
        config.effective_split_jobs(),
        BatchStage::Split,
        move |path| splitter.split_file(path, &dest_dir, limit),
        on_progress,
    )
    .await)
}
