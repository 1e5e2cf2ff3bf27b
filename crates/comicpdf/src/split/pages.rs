//! Extraction of contiguous page spans into standalone documents.
//!
//! A part is built by whitelist: a fresh document receives the selected page
//! dictionaries and everything they reference, under a new single-level page
//! tree and a minimal catalog. Other pages, the source page tree and the
//! source catalog are never copied, so outlines or annotations pointing
//! elsewhere cannot drag unrelated pages into the part; such references are
//! replaced with `null`.

use lopdf::{Document, Object, ObjectId, dictionary};
use std::collections::BTreeSet;

use super::plan::PageSpan;
use crate::error::{ComicPdfError, Result};
use crate::utils::{copy_references, drop_dangling_references};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Upper bound on page tree depth when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Builds single-span documents out of a loaded source document.
#[derive(Debug)]
pub struct PageExtractor<'a> {
    source: &'a Document,
    page_ids: Vec<ObjectId>,
    skip: BTreeSet<ObjectId>,
}

impl<'a> PageExtractor<'a> {
    /// Prepare extraction from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if a page object is not a dictionary.
    pub fn new(source: &'a Document) -> Result<Self> {
        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let mut skip: BTreeSet<ObjectId> = page_ids.iter().copied().collect();

        for &page_id in &page_ids {
            let mut node = source.get_dictionary(page_id).map_err(|e| {
                ComicPdfError::other(format!("Page {page_id:?} is not a dictionary: {e}"))
            })?;
            for _ in 0..MAX_TREE_DEPTH {
                let Ok(parent) = node.get(b"Parent").and_then(Object::as_reference) else {
                    break;
                };
                if !skip.insert(parent) {
                    break;
                }
                match source.get_dictionary(parent) {
                    Ok(dict) => node = dict,
                    Err(_) => break,
                }
            }
        }

        if let Ok(root) = source.trailer.get(b"Root").and_then(Object::as_reference) {
            skip.insert(root);
        }

        Ok(Self {
            source,
            page_ids,
            skip,
        })
    }

    /// Number of pages in the source.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Build a document holding exactly the pages of `span`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the span is empty or out of range, or a page
    /// object cannot be read.
    pub fn extract(&self, span: PageSpan) -> Result<Document> {
        if span.is_empty() || span.end > self.page_ids.len() {
            return Err(ComicPdfError::other(format!(
                "Page span {}-{} is outside 1-{}",
                span.first_page(),
                span.last_page(),
                self.page_ids.len()
            )));
        }

        let mut part = Document::with_version(self.source.version.clone());
        part.max_id = self.source.max_id;
        let pages_id = part.new_object_id();

        let mut kids = Vec::with_capacity(span.len());
        for &page_id in &self.page_ids[span.start..span.end] {
            let mut page = self
                .source
                .get_dictionary(page_id)
                .map_err(|e| {
                    ComicPdfError::other(format!("Page {page_id:?} is not a dictionary: {e}"))
                })?
                .clone();

            for key in INHERITABLE_ATTRIBUTES {
                if !page.has(key)
                    && let Some(value) = self.inherited(page_id, key)
                {
                    page.set(key.to_vec(), value.clone());
                }
            }
            page.set("Parent", Object::Reference(pages_id));

            let page = Object::Dictionary(page);
            copy_references(&mut part, self.source, &page, &self.skip);
            part.objects.insert(page_id, page);
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        part.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => Object::Name(b"Pages".to_vec()),
                "Kids" => Object::Array(kids),
                "Count" => Object::Integer(count),
            }),
        );

        let catalog_id = part.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(pages_id),
        });
        part.trailer.set("Root", Object::Reference(catalog_id));

        drop_dangling_references(&mut part);
        part.renumber_objects();

        Ok(part)
    }

    /// Look `key` up on the page's ancestors.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
        let mut node = self.source.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_TREE_DEPTH {
            let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            node = self.source.get_dictionary(parent).ok()?;
            if let Ok(value) = node.get(key) {
                return Some(value);
            }
        }
        None
    }
}
