//! User-facing output for comicpdf.
//!
//! The library itself never prints; batch drivers report through a
//! progress callback. This module turns those events and the final
//! summaries into terminal output.
//!
//! # Examples
//!
//! ```no_run
//! use comicpdf::{batch, output};
//! use comicpdf::config::Config;
//!
//! # async fn example(config: Config) -> comicpdf::Result<()> {
//! let formatter = output::create_formatter(&config);
//! let summary = batch::convert_all(&config, |p| output::display_progress(&formatter, &p)).await?;
//! output::display_convert_summary(&formatter, &summary);
//! # Ok(())
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::batch::{BatchProgress, BatchStage, BatchSummary, ConvertOutcome};
use crate::config::Config;
use crate::split::SplitOutcome;
use crate::utils::format_file_size;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Show one finished file of a batch.
pub fn display_progress(formatter: &OutputFormatter, progress: &BatchProgress) {
    let verb = match progress.stage {
        BatchStage::Convert => "Converting",
        BatchStage::Split => "Checking",
    };
    let name = progress
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    formatter.progress(
        progress.completed,
        progress.total,
        Some(&format!("{verb} {name}")),
    );
}

/// Describe a conversion outcome in one line.
pub fn describe_convert(outcome: &ConvertOutcome) -> String {
    match outcome {
        ConvertOutcome::Created {
            output,
            pages,
            bytes,
        } => format!(
            "{} ({pages} pages, {})",
            output.display(),
            format_file_size(*bytes)
        ),
        ConvertOutcome::Skipped { output, reason } => {
            format!("{} skipped: {reason}", output.display())
        }
        ConvertOutcome::DryRun { output, pages } => {
            format!("would write {} ({pages} pages)", output.display())
        }
    }
}

/// Describe a split outcome in one line.
pub fn describe_split(outcome: &SplitOutcome) -> String {
    match outcome {
        SplitOutcome::WithinLimit { size, limit } => format!(
            "within limit ({} <= {})",
            format_file_size(*size),
            format_file_size(*limit)
        ),
        SplitOutcome::Split(report) => format!(
            "split into {} part(s) from {}",
            report.parts.len(),
            format_file_size(report.original_size)
        ),
        SplitOutcome::DryRun {
            total_pages,
            original_size,
            estimate,
        } => format!(
            "would split {} ({total_pages} pages) into ~{} part(s) of {} page(s)",
            format_file_size(*original_size),
            estimate.num_parts,
            estimate.pages_per_part
        ),
    }
}

/// Display the result of a conversion batch.
pub fn display_convert_summary(formatter: &OutputFormatter, summary: &BatchSummary<ConvertOutcome>) {
    formatter.section("Conversion");

    for report in &summary.reports {
        match &report.result {
            Ok(outcome @ ConvertOutcome::Skipped { .. }) => {
                formatter.info(&format!("{}: {}", report.path.display(), describe_convert(outcome)));
            }
            Ok(outcome) => formatter.debug(&describe_convert(outcome)),
            Err(err) => formatter.error(&err.to_string()),
        }
    }

    let created = summary
        .outcomes()
        .filter(|(_, o)| matches!(o, ConvertOutcome::Created { .. }))
        .count();
    let skipped = summary
        .outcomes()
        .filter(|(_, o)| matches!(o, ConvertOutcome::Skipped { .. }))
        .count();

    if summary.has_failures() {
        formatter.warning(&format!("{} archive(s) failed", summary.failed()));
    }
    formatter.success(&format!(
        "Converted {created} of {} archive(s), {skipped} skipped, in {:.2}s",
        summary.total(),
        summary.elapsed.as_secs_f64()
    ));
}

/// Display the result of a split batch.
pub fn display_split_summary(formatter: &OutputFormatter, summary: &BatchSummary<SplitOutcome>) {
    formatter.section("Splitting");

    let mut split_files = 0;
    for report in &summary.reports {
        match &report.result {
            Ok(outcome @ SplitOutcome::Split(split)) => {
                split_files += 1;
                formatter.info(&format!("{}: {}", report.path.display(), describe_split(outcome)));
                for part in &split.parts {
                    formatter.detail(
                        &format!("part {}", part.index),
                        &format!(
                            "pages {}-{}, {}{}",
                            part.first_page,
                            part.last_page,
                            part.format_file_size(),
                            if part.oversized { " (single page over limit)" } else { "" }
                        ),
                    );
                }
                for part in split.oversized_parts() {
                    formatter.warning(&format!(
                        "{} is over the limit: page {} alone is {}",
                        part.path.display(),
                        part.first_page,
                        part.format_file_size()
                    ));
                }
            }
            Ok(outcome) => {
                formatter.debug(&format!("{}: {}", report.path.display(), describe_split(outcome)));
            }
            Err(err) => formatter.error(&err.to_string()),
        }
    }

    if summary.has_failures() {
        formatter.warning(&format!("{} file(s) failed", summary.failed()));
    }
    formatter.success(&format!(
        "Checked {} PDF(s), {split_files} split, in {:.2}s",
        summary.total(),
        summary.elapsed.as_secs_f64()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::{PartInfo, SplitEstimate, SplitReport};
    use std::path::PathBuf;

    #[test]
    fn test_describe_convert() {
        let created = ConvertOutcome::Created {
            output: PathBuf::from("out/a.pdf"),
            pages: 12,
            bytes: 2048,
        };
        assert_eq!(describe_convert(&created), "out/a.pdf (12 pages, 2.00 KB)");

        let skipped = ConvertOutcome::Skipped {
            output: PathBuf::from("out/b.pdf"),
            reason: crate::batch::SkipReason::NoImages,
        };
        assert_eq!(describe_convert(&skipped), "out/b.pdf skipped: no images found");
    }

    #[test]
    fn test_describe_split() {
        let report = SplitReport {
            source: PathBuf::from("big.pdf"),
            total_pages: 4,
            original_size: 3 * 1024 * 1024,
            limit: 2 * 1024 * 1024,
            estimate: SplitEstimate::new(3, 4, 2),
            parts: vec![PartInfo {
                index: 1,
                path: PathBuf::from("big-1.pdf"),
                first_page: 1,
                last_page: 4,
                bytes: 10,
                attempts: 1,
                oversized: false,
            }],
        };
        assert_eq!(
            describe_split(&SplitOutcome::Split(report)),
            "split into 1 part(s) from 3.00 MB"
        );

        let within = SplitOutcome::WithinLimit {
            size: 512,
            limit: 1024,
        };
        assert_eq!(describe_split(&within), "within limit (512 bytes <= 1.00 KB)");
    }

    #[test]
    fn test_display_summaries_do_not_panic() {
        let formatter = OutputFormatter::quiet();
        display_convert_summary(&formatter, &BatchSummary::empty());
        display_split_summary(&formatter, &BatchSummary::empty());
    }
}
