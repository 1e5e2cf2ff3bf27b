//! Page-range planning for size-constrained splitting.
//!
//! Nothing here touches PDFs or the filesystem. The caller supplies a
//! `render` capability that materializes a candidate page span and reports
//! its size, and a `commit` capability that receives each accepted part.
//!
//! The outer loop ([`split_pages`]) carves candidates of the estimated width
//! from a monotonically advancing [`Cursor`]. The inner loop
//! ([`choose_part_range`]) shrinks a candidate one page at a time until it
//! fits under the ceiling, accepting a single page unconditionally.
//!
//! # Examples
//!
//! ```
//! use comicpdf::split::{PageSpan, SplitEstimate, split_pages};
//!
//! let sizes = [10u64, 10, 10, 10, 100, 10, 10, 10, 10, 10];
//! let estimate = SplitEstimate::new(190, sizes.len(), 95);
//!
//! let mut spans = Vec::new();
//! split_pages(
//!     sizes.len(),
//!     estimate,
//!     95,
//!     |span: PageSpan| Ok::<u64, ()>(sizes[span.start..span.end].iter().sum()),
//!     |_, part| {
//!         spans.push((part.span.first_page(), part.span.last_page()));
//!         Ok(())
//!     },
//! )
//! .unwrap();
//!
//! assert_eq!(spans, vec![(1, 4), (5, 5), (6, 10)]);
//! ```

use serde::Serialize;

/// Anything whose serialized size is known.
pub trait Measured {
    /// Size in bytes.
    fn byte_size(&self) -> u64;
}

impl Measured for u64 {
    fn byte_size(&self) -> u64 {
        *self
    }
}

impl Measured for Vec<u8> {
    fn byte_size(&self) -> u64 {
        self.len() as u64
    }
}

/// A half-open, 0-based range of pages `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageSpan {
    /// First page, inclusive.
    pub start: usize,
    /// One past the last page.
    pub end: usize,
}

impl PageSpan {
    /// Create a span. An `end` before `start` gives an empty span.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of pages in the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span holds no pages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based number of the first page.
    pub fn first_page(&self) -> usize {
        self.start + 1
    }

    /// 1-based number of the last page.
    pub fn last_page(&self) -> usize {
        self.end
    }

    /// 1-based page numbers covered by the span.
    pub fn page_numbers(&self) -> std::ops::RangeInclusive<usize> {
        self.first_page()..=self.last_page()
    }
}

/// The coarse up-front estimate driving the outer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitEstimate {
    /// Expected number of parts, `ceil(original_size / ceiling)`.
    pub num_parts: usize,
    /// Candidate width, `ceil(total_pages / num_parts)`.
    pub pages_per_part: usize,
}

impl SplitEstimate {
    /// Estimate from the source size, page count and ceiling.
    ///
    /// Both figures are at least 1, and a zero ceiling is treated as one
    /// byte.
    pub fn new(original_size: u64, total_pages: usize, ceiling: u64) -> Self {
        let num_parts = original_size.div_ceil(ceiling.max(1)).max(1);
        let num_parts = usize::try_from(num_parts).unwrap_or(usize::MAX);
        let pages_per_part = total_pages.div_ceil(num_parts).max(1);

        Self {
            num_parts,
            pages_per_part,
        }
    }
}

/// Position of the outer loop.
///
/// `committed_page` only moves forward, and only when a part is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cursor {
    /// Pages before this index belong to accepted parts.
    pub committed_page: usize,
    /// 1-based index the next accepted part receives.
    pub part_index: usize,
}

impl Cursor {
    /// A cursor at page 0, expecting part 1.
    pub fn start() -> Self {
        Self {
            committed_page: 0,
            part_index: 1,
        }
    }

    /// The cursor after accepting `span`.
    pub fn advance(self, span: PageSpan) -> Self {
        debug_assert_eq!(span.start, self.committed_page);
        Self {
            committed_page: span.end,
            part_index: self.part_index + 1,
        }
    }

    /// Number of parts accepted so far.
    pub fn parts_committed(&self) -> usize {
        self.part_index - 1
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

/// A candidate that was accepted as a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedPart<M> {
    /// Pages of the part.
    pub span: PageSpan,
    /// The rendering that was measured and accepted.
    pub rendered: M,
    /// Number of renderings tried for this part, including the accepted one.
    pub attempts: usize,
    /// Single page accepted despite exceeding the ceiling.
    pub oversized: bool,
}

impl<M: Measured> AcceptedPart<M> {
    /// Size of the accepted rendering.
    pub fn byte_size(&self) -> u64 {
        self.rendered.byte_size()
    }
}

/// Choose the part starting at `start`.
///
/// The first candidate spans `width` pages, clamped to `total_pages`. While
/// the rendering exceeds `ceiling` and the candidate has more than one page,
/// the last page is dropped and the candidate rendered again. A single page
/// is accepted whatever its size.
///
/// Returns `None` without rendering when `start` is not below
/// `total_pages`. A `width` of 0 is treated as 1.
///
/// # Errors
///
/// Propagates the first error returned by `render`.
pub fn choose_part_range<M, E, R>(
    start: usize,
    width: usize,
    total_pages: usize,
    ceiling: u64,
    mut render: R,
) -> Result<Option<AcceptedPart<M>>, E>
where
    M: Measured,
    R: FnMut(PageSpan) -> Result<M, E>,
{
    if start >= total_pages {
        return Ok(None);
    }

    let mut end = start.saturating_add(width.max(1)).min(total_pages);
    let mut attempts = 0;

    loop {
        let span = PageSpan::new(start, end);
        let rendered = render(span)?;
        attempts += 1;

        let fits = rendered.byte_size() <= ceiling;
        if fits || span.len() <= 1 {
            return Ok(Some(AcceptedPart {
                span,
                rendered,
                attempts,
                oversized: !fits,
            }));
        }

        end -= 1;
    }
}

/// Partition `total_pages` pages into parts under `ceiling`.
///
/// Each part starts where the previous one ended, with a first candidate of
/// `estimate.pages_per_part` pages regardless of how far the previous part
/// shrank. `commit` receives the 1-based part index and the accepted part,
/// in page order.
///
/// Returns the final cursor; its `committed_page` equals `total_pages`.
///
/// # Errors
///
/// Stops at the first error from `render` or `commit`. Parts committed
/// before the error stay committed.
pub fn split_pages<M, E, R, C>(
    total_pages: usize,
    estimate: SplitEstimate,
    ceiling: u64,
    mut render: R,
    mut commit: C,
) -> Result<Cursor, E>
where
    M: Measured,
    R: FnMut(PageSpan) -> Result<M, E>,
    C: FnMut(usize, AcceptedPart<M>) -> Result<(), E>,
{
    let mut cursor = Cursor::start();

    while let Some(part) = choose_part_range(
        cursor.committed_page,
        estimate.pages_per_part,
        total_pages,
        ceiling,
        &mut render,
    )? {
        let next = cursor.advance(part.span);
        commit(cursor.part_index, part)?;
        cursor = next;
    }

    Ok(cursor)
}
