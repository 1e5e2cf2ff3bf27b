//! One-image-per-page PDF assembly.
//!
//! Every page image is decoded, normalized to 8-bit RGB and re-encoded as a
//! baseline JPEG, then embedded as a `DCTDecode` image XObject that fills the
//! page. Page size follows the image size at the configured resolution.
//!
//! # Examples
//!
//! ```no_run
//! use comicpdf::archive;
//! use comicpdf::config::ConvertOptions;
//! use comicpdf::document::DocumentBuilder;
//! use std::path::Path;
//!
//! # fn example() -> comicpdf::Result<()> {
//! let source = Path::new("issue-01.cbz");
//! let pages = archive::read_pages(source)?;
//! let builder = DocumentBuilder::new(ConvertOptions::default());
//! let stats = builder.build_to_file(source, &pages, Path::new("out/issue-01.pdf"))?;
//! println!("wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

use crate::archive::PageEntry;
use crate::config::ConvertOptions;
use crate::error::{ComicPdfError, Result};
use crate::io::{PdfWriter, WriteStatistics};

const POINTS_PER_INCH: f32 = 72.0;
const IMAGE_NAME: &[u8] = b"Im0";

/// A decoded page, normalized and re-encoded for embedding.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Entry name the page came from.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Baseline JPEG of the RGB8 pixels.
    pub jpeg: Vec<u8>,
}

impl PageImage {
    /// Decode `entry`, convert it to RGB8 and encode it as JPEG.
    ///
    /// # Errors
    ///
    /// Returns `ImageDecode` if the bytes are not a supported image, or
    /// `ImageEncode` if JPEG encoding fails.
    pub fn decode(source: &Path, entry: &PageEntry, quality: u8) -> Result<Self> {
        let decoded = image::load_from_memory(&entry.data).map_err(|err| {
            ComicPdfError::image_decode(source.to_path_buf(), &entry.name, err.to_string())
        })?;

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality)
            .encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|err| ComicPdfError::ImageEncode {
                entry: entry.name.clone(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            name: entry.name.clone(),
            width,
            height,
            jpeg,
        })
    }
}

/// Assembles page images into a PDF document.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    options: ConvertOptions,
}

impl DocumentBuilder {
    /// Create a builder with the given embedding options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Build a document with one page per entry, in the given order.
    ///
    /// `source` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns `NoImages` for an empty entry list, and the first decode or
    /// encode failure otherwise; no partial document is returned.
    pub fn build(&self, source: &Path, entries: &[PageEntry]) -> Result<Document> {
        if entries.is_empty() {
            return Err(ComicPdfError::no_images(source.to_path_buf()));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::with_capacity(entries.len());

        for entry in entries {
            let page = PageImage::decode(source, entry, self.options.jpeg_quality)?;
            let page_id = self.add_page(&mut doc, pages_id, page)?;
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

        Ok(doc)
    }

    /// Build the document and save it to `dest`, creating its directory.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentBuilder::build`], plus write failures.
    pub fn build_to_file(
        &self,
        source: &Path,
        entries: &[PageEntry],
        dest: &Path,
    ) -> Result<WriteStatistics> {
        let mut doc = self.build(source, entries)?;
        PdfWriter::new().save(&mut doc, dest)
    }

    /// Page size in points for an image of the given pixel size.
    pub fn page_size(&self, width: u32, height: u32) -> (f32, f32) {
        let scale = POINTS_PER_INCH / self.options.dpi;
        (width as f32 * scale, height as f32 * scale)
    }

    fn add_page(&self, doc: &mut Document, pages_id: ObjectId, page: PageImage) -> Result<ObjectId> {
        let (width_pt, height_pt) = self.page_size(page.width, page.height);

        let image = Stream::new(
            dictionary! {
                "Type" => Object::Name(b"XObject".to_vec()),
                "Subtype" => Object::Name(b"Image".to_vec()),
                "Width" => Object::Integer(page.width as i64),
                "Height" => Object::Integer(page.height as i64),
                "ColorSpace" => Object::Name(b"DeviceRGB".to_vec()),
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => Object::Name(b"DCTDecode".to_vec()),
            },
            page.jpeg,
        );
        let image_id = doc.add_object(image);

        // Scale the unit image square to the full page.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width_pt),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(height_pt),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let mut xobjects = Dictionary::new();
        xobjects.set(IMAGE_NAME.to_vec(), Object::Reference(image_id));

        let page_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ]),
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
            "Contents" => Object::Reference(content_id),
        });

        Ok(page_id)
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}
