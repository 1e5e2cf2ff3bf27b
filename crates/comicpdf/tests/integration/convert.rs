//! Integration tests for archive conversion.

use comicpdf::batch::{self, ConvertOutcome, Converter, SkipReason};
use comicpdf::config::{Config, ConvertOptions, OverwriteMode};
use comicpdf::error::ComicPdfError;
use tempfile::tempdir;

use super::common::{file_names, jpeg_page, page_count, page_sizes, png_page, write_cbz};

#[test]
fn test_pages_follow_sorted_entry_names() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("issue.cbz");
    write_cbz(
        &archive,
        &[
            ("b.jpg", jpeg_page(30, 40)),
            ("a.jpg", jpeg_page(10, 20)),
            ("c.png", png_page(50, 60)),
        ],
    );

    let outcome = Converter::default()
        .convert_file(&archive, dir.path())
        .unwrap();
    assert!(matches!(outcome, ConvertOutcome::Created { pages: 3, .. }));

    let sizes = page_sizes(&dir.path().join("issue.pdf"));
    assert_eq!(sizes, vec![(10.0, 20.0), (30.0, 40.0), (50.0, 60.0)]);
}

#[cfg(feature = "rar")]
#[test]
fn test_cbr_pages_follow_sorted_entry_names() {
    let dir = tempdir().unwrap();
    let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pages.cbr");
    let archive = dir.path().join("rar-issue.cbr");
    std::fs::copy(&fixture, &archive).unwrap();

    let outcome = Converter::default()
        .convert_file(&archive, dir.path())
        .unwrap();
    assert!(matches!(outcome, ConvertOutcome::Created { pages: 2, .. }));

    let sizes = page_sizes(&dir.path().join("rar-issue.pdf"));
    assert_eq!(sizes, vec![(7.0, 2.0), (3.0, 5.0)]);
}

#[test]
fn test_non_image_entries_are_ignored() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("issue.cbz");
    write_cbz(
        &archive,
        &[
            ("ComicInfo.xml", b"<ComicInfo/>".to_vec()),
            ("01.PNG", png_page(8, 8)),
            ("notes.txt", b"scanned by".to_vec()),
            ("02.Jpeg", jpeg_page(8, 8)),
        ],
    );

    let outcome = Converter::default()
        .convert_file(&archive, dir.path())
        .unwrap();

    assert!(matches!(outcome, ConvertOutcome::Created { pages: 2, .. }));
    assert_eq!(page_count(&dir.path().join("issue.pdf")), 2);
}

#[test]
fn test_archive_without_images_is_a_skip() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("extras.cbz");
    write_cbz(&archive, &[("ComicInfo.xml", b"<ComicInfo/>".to_vec())]);

    let outcome = Converter::default()
        .convert_file(&archive, dir.path())
        .unwrap();

    assert_eq!(
        outcome,
        ConvertOutcome::Skipped {
            output: dir.path().join("extras.pdf"),
            reason: SkipReason::NoImages,
        }
    );
    assert!(!dir.path().join("extras.pdf").exists());
}

#[test]
fn test_dpi_scales_page_size() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("hires.cbz");
    write_cbz(&archive, &[("1.png", png_page(300, 600))]);

    let options = ConvertOptions {
        dpi: 300.0,
        ..Default::default()
    };
    Converter::new(options)
        .convert_file(&archive, dir.path())
        .unwrap();

    let sizes = page_sizes(&dir.path().join("hires.pdf"));
    assert_eq!(sizes.len(), 1);
    assert!((sizes[0].0 - 72.0).abs() < 0.01);
    assert!((sizes[0].1 - 144.0).abs() < 0.01);
}

#[tokio::test]
async fn test_batch_isolates_corrupt_archive() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("library");
    let output = dir.path().join("pdf");

    write_cbz(&input.join("a.cbz"), &[("1.png", png_page(4, 4))]);
    write_cbz(&input.join("series/b.cbz"), &[("1.jpg", jpeg_page(4, 4))]);
    std::fs::write(input.join("c.cbz"), b"PK but not really").unwrap();
    write_cbz(&input.join("d.cbz"), &[("cover.png", png_page(4, 4))]);
    std::fs::write(input.join("cover.png"), png_page(4, 4)).unwrap();

    let config = Config::new(&input, &output);
    let summary = batch::convert_all(&config, |_| {}).await.unwrap();

    assert_eq!(summary.total(), 4);
    assert_eq!(summary.failed(), 1);

    let (path, err) = summary.failures().next().unwrap();
    assert!(path.ends_with("c.cbz"));
    assert!(matches!(err, ComicPdfError::FailedToOpenArchive { .. }));

    assert_eq!(file_names(&output), vec!["a.pdf", "b.pdf", "d.pdf"]);
}

#[tokio::test]
async fn test_batch_keeps_existing_pdfs_without_force() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_cbz(&root.join("issue.cbz"), &[("1.png", png_page(4, 4))]);
    std::fs::write(root.join("issue.pdf"), b"hand edited").unwrap();

    let config = Config::new(root, root);
    let summary = batch::convert_all(&config, |_| {}).await.unwrap();
    let (_, outcome) = summary.outcomes().next().unwrap();
    assert!(matches!(
        outcome,
        ConvertOutcome::Skipped {
            reason: SkipReason::OutputExists,
            ..
        }
    ));
    assert_eq!(std::fs::read(root.join("issue.pdf")).unwrap(), b"hand edited");

    let mut config = Config::new(root, root);
    config.overwrite_mode = OverwriteMode::Force;
    let summary = batch::convert_all(&config, |_| {}).await.unwrap();
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(page_count(&root.join("issue.pdf")), 1);
}

#[tokio::test]
async fn test_batch_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    write_cbz(&input.join("issue.cbz"), &[("1.png", png_page(4, 4)), ("2.png", png_page(4, 4))]);

    let mut config = Config::new(&input, &output);
    config.dry_run = true;
    let summary = batch::convert_all(&config, |_| {}).await.unwrap();

    let (_, outcome) = summary.outcomes().next().unwrap();
    assert!(matches!(outcome, ConvertOutcome::DryRun { pages: 2, .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_sequential_and_parallel_batches_agree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    for name in ["a", "b", "c", "d", "e"] {
        write_cbz(&input.join(format!("{name}.cbz")), &[("1.png", png_page(4, 4))]);
    }

    let mut sequential = Config::new(&input, dir.path().join("seq"));
    sequential.jobs = Some(1);
    let mut parallel = Config::new(&input, dir.path().join("par"));
    parallel.jobs = Some(4);

    let seq = batch::convert_all(&sequential, |_| {}).await.unwrap();
    let par = batch::convert_all(&parallel, |_| {}).await.unwrap();

    let seq_paths: Vec<_> = seq.reports.iter().map(|r| r.path.clone()).collect();
    let par_paths: Vec<_> = par.reports.iter().map(|r| r.path.clone()).collect();
    assert_eq!(seq_paths, par_paths);
    assert_eq!(file_names(&dir.path().join("seq")), file_names(&dir.path().join("par")));
}
