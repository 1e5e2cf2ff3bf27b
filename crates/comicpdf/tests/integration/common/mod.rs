//! Shared fixtures for the comicpdf integration tests.
//!
//! Fixtures are generated at test time: CBZ archives are zipped from
//! freshly encoded images, PDFs are assembled with lopdf.

#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use lopdf::{Document, Object, Stream, dictionary};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

/// Encode a solid `width` x `height` image in `format`.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), format)
        .expect("Failed to encode fixture image");
    data
}

/// A small PNG page.
pub fn png_page(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

/// A PNG page filled with pseudo-random noise, so its JPEG re-encoding
/// stays large.
pub fn noisy_png_page(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let img = RgbImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
        .expect("Failed to encode fixture image");
    data
}

/// A small JPEG page.
pub fn jpeg_page(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Jpeg)
}

/// Write a CBZ holding `entries` in the given storage order.
pub fn write_cbz(path: &Path, entries: &[(&str, Vec<u8>)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    let file = File::create(path).expect("Failed to create fixture archive");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).expect("Failed to start entry");
        zip.write_all(data).expect("Failed to write entry");
    }
    zip.finish().expect("Failed to finish archive");
}

/// Build a PDF whose pages each carry an opaque image stream of the given
/// length. Page `n` also gets `/PageLabel n` so tests can tell pages apart
/// after a split.
pub fn pdf_with_payloads(payloads: &[usize]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();

    for (index, &len) in payloads.iter().enumerate() {
        let data: Vec<u8> = (0..len).map(|i| ((i * 31 + index * 17) % 251) as u8).collect();
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => Object::Name(b"XObject".to_vec()),
                "Subtype" => Object::Name(b"Image".to_vec()),
                "Width" => Object::Integer(1),
                "Height" => Object::Integer(1),
                "ColorSpace" => Object::Name(b"DeviceRGB".to_vec()),
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => Object::Name(b"DCTDecode".to_vec()),
            },
            data,
        ));
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(100),
                Object::Integer(100),
            ]),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => Object::Reference(image_id),
                },
            },
            "Contents" => Object::Reference(content_id),
            "PageLabel" => Object::Integer(index as i64 + 1),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

/// Write a [`pdf_with_payloads`] document to `path`.
pub fn write_pdf(path: &Path, payloads: &[usize]) {
    let mut doc = pdf_with_payloads(payloads);
    doc.save(path).expect("Failed to write fixture PDF");
}

/// Page count of the PDF at `path`.
pub fn page_count(path: &Path) -> usize {
    Document::load(path)
        .expect("Failed to load PDF")
        .get_pages()
        .len()
}

/// The `/PageLabel` values of the pages of `path`, in page order.
pub fn page_labels(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            doc.get_dictionary(id)
                .and_then(|page| page.get(b"PageLabel"))
                .and_then(Object::as_i64)
                .expect("page without label")
        })
        .collect()
}

/// MediaBox width and height of every page of `path`.
pub fn page_sizes(path: &Path) -> Vec<(f32, f32)> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let media_box = doc
                .get_dictionary(id)
                .and_then(|page| page.get(b"MediaBox"))
                .and_then(Object::as_array)
                .expect("page without MediaBox");
            let coord = |i: usize| media_box[i].as_float().expect("non-numeric MediaBox");
            (coord(2) - coord(0), coord(3) - coord(1))
        })
        .collect()
}

/// Names of the files directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
