//! Integration tests for size-constrained splitting.

use comicpdf::batch;
use comicpdf::config::{Config, OverwriteMode, SizeLimit};
use comicpdf::error::ComicPdfError;
use comicpdf::split::{SplitOutcome, SplitReport, Splitter};
use std::path::Path;
use tempfile::tempdir;

use super::common::{file_names, page_labels, write_pdf};

fn limit(bytes: u64) -> SizeLimit {
    SizeLimit::from_bytes(bytes).unwrap()
}

fn expect_split(outcome: SplitOutcome) -> SplitReport {
    match outcome {
        SplitOutcome::Split(report) => report,
        other => panic!("expected a split, got {other:?}"),
    }
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).unwrap().len()
}

#[test]
fn test_huge_page_gets_its_own_part() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("book.pdf");
    let mut payloads = vec![500; 10];
    payloads[4] = 30_000;
    write_pdf(&source, &payloads);

    let out = dir.path().join("parts");
    let report = expect_split(
        Splitter::new()
            .split_file(&source, &out, limit(25_000))
            .unwrap(),
    );

    assert_eq!(report.estimate.num_parts, 2);
    assert_eq!(report.estimate.pages_per_part, 5);

    let spans: Vec<_> = report
        .parts
        .iter()
        .map(|p| (p.first_page, p.last_page))
        .collect();
    assert_eq!(spans, vec![(1, 4), (5, 5), (6, 10)]);
    assert!(report.parts[1].oversized);
    assert!(!report.parts[0].oversized && !report.parts[2].oversized);

    assert_eq!(file_names(&out), vec!["book-1.pdf", "book-2.pdf", "book-3.pdf"]);
    assert_eq!(page_labels(&out.join("book-1.pdf")), vec![1, 2, 3, 4]);
    assert_eq!(page_labels(&out.join("book-2.pdf")), vec![5]);
    assert_eq!(page_labels(&out.join("book-3.pdf")), vec![6, 7, 8, 9, 10]);
}

#[test]
fn test_parts_cover_every_page_once_within_limit() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("omnibus.pdf");
    let payloads: Vec<usize> = (0..23).map(|i| 800 + (i * 937) % 4000).collect();
    write_pdf(&source, &payloads);

    let ceiling = 12_000;
    let report = expect_split(
        Splitter::new()
            .split_file(&source, dir.path(), limit(ceiling))
            .unwrap(),
    );

    let mut labels = Vec::new();
    for (i, part) in report.parts.iter().enumerate() {
        assert_eq!(part.index, i + 1);
        assert_eq!(part.path, dir.path().join(format!("omnibus-{}.pdf", i + 1)));
        assert_eq!(part.bytes, file_size(&part.path));
        if part.page_count() > 1 {
            assert!(part.bytes <= ceiling, "part {} is {} bytes", part.index, part.bytes);
        }
        labels.extend(page_labels(&part.path));
    }

    let expected: Vec<i64> = (1..=23).collect();
    assert_eq!(labels, expected);
}

#[test]
fn test_small_file_is_left_alone() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("slim.pdf");
    write_pdf(&source, &[100, 100]);
    let before = std::fs::read(&source).unwrap();

    let outcome = Splitter::new()
        .split_file(&source, dir.path(), limit(1024 * 1024))
        .unwrap();

    assert!(matches!(outcome, SplitOutcome::WithinLimit { .. }));
    assert_eq!(file_names(dir.path()), vec!["slim.pdf"]);
    assert_eq!(std::fs::read(&source).unwrap(), before);
}

#[test]
fn test_file_exactly_at_limit_is_not_split() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("exact.pdf");
    write_pdf(&source, &[3000, 3000, 3000]);

    let outcome = Splitter::new()
        .split_file(&source, dir.path(), limit(file_size(&source)))
        .unwrap();

    assert!(matches!(outcome, SplitOutcome::WithinLimit { .. }));
    assert!(!dir.path().join("exact-1.pdf").exists());
}

#[test]
fn test_existing_parts_are_protected() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("book.pdf");
    write_pdf(&source, &[4000; 6]);
    std::fs::write(dir.path().join("book-1.pdf"), b"previous run").unwrap();

    let err = Splitter::new()
        .split_file(&source, dir.path(), limit(10_000))
        .unwrap_err();
    assert!(matches!(err, ComicPdfError::OutputExists { .. }));
    assert_eq!(std::fs::read(dir.path().join("book-1.pdf")).unwrap(), b"previous run");

    let report = expect_split(
        Splitter::new()
            .with_overwrite(OverwriteMode::Force)
            .split_file(&source, dir.path(), limit(10_000))
            .unwrap(),
    );
    assert!(report.parts.len() >= 3);
    assert_ne!(std::fs::read(dir.path().join("book-1.pdf")).unwrap(), b"previous run");
}

#[test]
fn test_missing_source_fails() {
    let dir = tempdir().unwrap();
    let err = Splitter::new()
        .split_file(&dir.path().join("gone.pdf"), dir.path(), limit(10))
        .unwrap_err();
    assert!(matches!(err, ComicPdfError::FileNotFound { .. }));
}

#[tokio::test]
async fn test_batch_does_not_resplit_its_own_parts() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_pdf(&root.join("big.pdf"), &[5000; 4]);
    write_pdf(&root.join("small.pdf"), &[10]);
    std::fs::write(root.join("notes.txt"), vec![b'x'; 50_000]).unwrap();

    let config = Config::new(root, root).with_size_limit(limit(12_000));
    let summary = batch::split_all(&config, |_| {}).await.unwrap();

    assert_eq!(summary.total(), 2);
    assert!(!summary.has_failures());
    assert!(root.join("big-1.pdf").exists());
    assert!(!root.join("big-1-1.pdf").exists());
    assert!(!root.join("small-1.pdf").exists());
}

#[tokio::test]
async fn test_batch_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_pdf(&root.join("big.pdf"), &[5000; 4]);

    let mut config = Config::new(root, root.join("parts")).with_size_limit(limit(12_000));
    config.dry_run = true;
    let summary = batch::split_all(&config, |_| {}).await.unwrap();

    let (_, outcome) = summary.outcomes().next().unwrap();
    match outcome {
        SplitOutcome::DryRun {
            total_pages,
            estimate,
            ..
        } => {
            assert_eq!(*total_pages, 4);
            assert_eq!(estimate.num_parts, 2);
        }
        other => panic!("expected a dry run, got {other:?}"),
    }
    assert!(!root.join("parts").exists());
    assert_eq!(file_names(root), vec!["big.pdf"]);
}
