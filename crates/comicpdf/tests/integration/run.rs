//! Integration tests for the convert-then-split pipeline.

use comicpdf::batch::{self, BatchStage, ConvertOutcome};
use comicpdf::config::{Config, SizeLimit};
use comicpdf::error::ComicPdfError;
use comicpdf::split::SplitOutcome;
use tempfile::tempdir;

use super::common::{file_names, noisy_png_page, page_count, write_cbz};

fn write_library(input: &std::path::Path) {
    let pages: Vec<(String, Vec<u8>)> = (0..6)
        .map(|i| (format!("{i:02}.png"), noisy_png_page(64, 64, i)))
        .collect();
    let entries: Vec<(&str, Vec<u8>)> = pages
        .iter()
        .map(|(name, data)| (name.as_str(), data.clone()))
        .collect();
    write_cbz(&input.join("thick.cbz"), &entries);
    write_cbz(&input.join("thin.cbz"), &[("1.png", noisy_png_page(8, 8, 99))]);
}

#[tokio::test]
async fn test_run_converts_then_splits_oversized_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cbz");
    write_library(&input);

    // Measure the converted size first to pick a ceiling that forces a split.
    let sizing = dir.path().join("sizing");
    batch::convert_all(&Config::new(&input, &sizing), |_| {})
        .await
        .unwrap();
    let thick_size = std::fs::metadata(sizing.join("thick.pdf")).unwrap().len();
    let thin_size = std::fs::metadata(sizing.join("thin.pdf")).unwrap().len();
    let ceiling = (thick_size / 2 + 1).max(thin_size);

    let output = dir.path().join("pdf");
    let config = Config::new(&input, &output).with_size_limit(SizeLimit::from_bytes(ceiling).unwrap());

    let mut stages = Vec::new();
    let summary = batch::run_all(&config, |p| stages.push(p.stage)).await.unwrap();

    assert!(!summary.has_failures());
    assert_eq!(summary.convert.total(), 2);
    assert!(
        summary
            .convert
            .outcomes()
            .all(|(_, o)| matches!(o, ConvertOutcome::Created { .. }))
    );
    assert_eq!(
        stages,
        vec![
            BatchStage::Convert,
            BatchStage::Convert,
            BatchStage::Split,
            BatchStage::Split
        ]
    );

    let thick = summary
        .split
        .outcomes()
        .find(|(p, _)| p.ends_with("thick.pdf"))
        .map(|(_, o)| o)
        .unwrap();
    let SplitOutcome::Split(report) = thick else {
        panic!("expected thick.pdf to be split, got {thick:?}");
    };
    assert!(report.parts.len() >= 2);

    let pages: usize = report.parts.iter().map(|p| page_count(&p.path)).sum();
    assert_eq!(pages, 6);
    for part in &report.parts {
        assert!(part.bytes <= ceiling || part.oversized);
    }

    let thin = summary
        .split
        .outcomes()
        .find(|(p, _)| p.ends_with("thin.pdf"))
        .map(|(_, o)| o)
        .unwrap();
    assert!(matches!(thin, SplitOutcome::WithinLimit { .. }));

    let names = file_names(&output);
    assert!(names.contains(&"thick.pdf".to_string()));
    assert!(names.contains(&"thick-1.pdf".to_string()));
    assert!(names.contains(&"thin.pdf".to_string()));
    assert!(!names.contains(&"thin-1.pdf".to_string()));
}

#[test]
fn test_zero_ceiling_is_rejected() {
    let err = SizeLimit::from_megabytes(0.0).unwrap_err();
    assert!(matches!(err, ComicPdfError::InvalidSizeLimit { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_run_without_ceiling_touches_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cbz");
    let output = dir.path().join("pdf");
    write_library(&input);

    let err = batch::run_all(&Config::new(&input, &output), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, ComicPdfError::InvalidConfig { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_run_dry_run_reports_without_writing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cbz");
    let output = dir.path().join("pdf");
    write_library(&input);

    let mut config = Config::new(&input, &output).with_size_limit(SizeLimit::default());
    config.dry_run = true;
    let summary = batch::run_all(&config, |_| {}).await.unwrap();

    assert_eq!(summary.convert.total(), 2);
    assert!(
        summary
            .convert
            .outcomes()
            .all(|(_, o)| matches!(o, ConvertOutcome::DryRun { .. }))
    );
    assert_eq!(summary.split.total(), 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_run_into_input_directory() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_cbz(&root.join("one.cbz"), &[("1.png", noisy_png_page(8, 8, 1))]);

    let config = Config::new(root, root).with_size_limit(SizeLimit::default());
    let summary = batch::run_all(&config, |_| {}).await.unwrap();

    assert_eq!(summary.convert.succeeded(), 1);
    assert_eq!(summary.split.total(), 1);
    assert_eq!(file_names(root), vec!["one.cbz", "one.pdf"]);
}
