//! JSON output formats.

use serde::Serialize;
use std::error::Error;

use comicpdf::batch::{BatchSummary, ConvertOutcome, RunSummary};
use comicpdf::split::SplitOutcome;

#[derive(Serialize)]
pub struct FileJson<'a, T> {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct StageJson<'a, T> {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_secs: f64,
    pub files: Vec<FileJson<'a, T>>,
}

impl<'a, T> StageJson<'a, T> {
    pub fn from_summary(summary: &'a BatchSummary<T>) -> Self {
        let files = summary
            .reports
            .iter()
            .map(|report| FileJson {
                path: report.path.display().to_string(),
                ok: report.is_ok(),
                outcome: report.result.as_ref().ok(),
                error: report.error().map(ToString::to_string),
            })
            .collect();

        Self {
            total: summary.total(),
            succeeded: summary.succeeded(),
            failed: summary.failed(),
            elapsed_secs: summary.elapsed.as_secs_f64(),
            files,
        }
    }
}

#[derive(Serialize)]
pub struct CommandJson<'a> {
    pub status: &'a str,
    pub command: &'a str,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convert: Option<StageJson<'a, ConvertOutcome>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<StageJson<'a, SplitOutcome>>,
}

impl<'a> CommandJson<'a> {
    pub fn convert(summary: &'a BatchSummary<ConvertOutcome>, dry_run: bool) -> Self {
        Self {
            status: status(summary.has_failures()),
            command: "convert",
            dry_run,
            convert: Some(StageJson::from_summary(summary)),
            split: None,
        }
    }

    pub fn split(summary: &'a BatchSummary<SplitOutcome>, dry_run: bool) -> Self {
        Self {
            status: status(summary.has_failures()),
            command: "split",
            dry_run,
            convert: None,
            split: Some(StageJson::from_summary(summary)),
        }
    }

    pub fn run(summary: &'a RunSummary, dry_run: bool) -> Self {
        Self {
            status: status(summary.has_failures()),
            command: "run",
            dry_run,
            convert: Some(StageJson::from_summary(&summary.convert)),
            split: Some(StageJson::from_summary(&summary.split)),
        }
    }
}

fn status(has_failures: bool) -> &'static str {
    if has_failures { "partial" } else { "ok" }
}

#[derive(Serialize)]
pub struct ErrorJson<'a> {
    pub status: &'a str,
    pub error: String,
    pub causes: Vec<String>,
}

impl ErrorJson<'_> {
    pub fn new(err: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            status: "error",
            error: err.to_string(),
            causes,
        }
    }
}
