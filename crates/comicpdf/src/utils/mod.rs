//! Utilities for file matching, naming, size display and object copying.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeSet;
use std::path::Path;

use crate::{Result, error::ComicPdfError};

/// Case-insensitive file name matcher over a set of extensions.
///
/// Patterns are `*.<ext>` globs, so `chapter/p01.JPG` matches `jpg`.
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    set: GlobSet,
}

impl ExtensionMatcher {
    /// Build a matcher for the given extensions (without the leading dot).
    ///
    /// # Errors
    ///
    /// Returns an error if an extension produces an invalid glob.
    pub fn new<T>(extensions: T) -> Result<Self>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();

        for ext in extensions {
            let pattern = format!("*.{}", ext.as_ref());
            let glob = GlobBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| ComicPdfError::other(err.to_string()))?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|err| ComicPdfError::other(err.to_string()))?;

        Ok(Self { set })
    }

    /// Check whether a path or archive entry name matches.
    pub fn is_match<P: AsRef<Path>>(&self, path: P) -> bool {
        self.set.is_match(path)
    }
}

/// File stem used to name outputs, falling back to `document`.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

/// Copy the objects `obj` refers to from `source` into `target`.
///
/// Walks references recursively and inserts every referenced object that
/// `target` does not hold yet. Ids in `skip` are neither copied nor walked;
/// references to them are left as they are.
pub fn copy_references(
    target: &mut Document,
    source: &Document,
    obj: &Object,
    skip: &BTreeSet<ObjectId>,
) {
    match obj {
        Object::Reference(ref_id) => {
            if !skip.contains(ref_id)
                && !target.objects.contains_key(ref_id)
                && let Ok(referenced_obj) = source.get_object(*ref_id)
            {
                target.objects.insert(*ref_id, referenced_obj.clone());
                copy_references(target, source, referenced_obj, skip);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                copy_references(target, source, value, skip);
            }
        }
        Object::Array(arr) => {
            for item in arr {
                copy_references(target, source, item, skip);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_references(target, source, value, skip);
            }
        }
        _ => {}
    }
}

/// Replace references to objects missing from `doc` with `null`.
pub fn drop_dangling_references(doc: &mut Document) {
    let live: BTreeSet<ObjectId> = doc.objects.keys().copied().collect();
    for obj in doc.objects.values_mut() {
        null_missing(obj, &live);
    }
}

fn null_missing(obj: &mut Object, live: &BTreeSet<ObjectId>) {
    match obj {
        Object::Reference(id) if !live.contains(id) => *obj = Object::Null,
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                null_missing(value, live);
            }
        }
        Object::Array(arr) => {
            for item in arr.iter_mut() {
                null_missing(item, live);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                null_missing(value, live);
            }
        }
        _ => {}
    }
}
