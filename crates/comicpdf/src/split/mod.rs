//! Size-constrained PDF splitting.
//!
//! - [`plan`]: pure page-range planning (estimate, shrink-to-fit, cursor)
//! - [`pages`]: extraction of a page span into a standalone document
//! - [`splitter`]: the file-level operation tying both to the PDF reader
//!   and writer

pub mod pages;
pub mod plan;
pub mod splitter;

pub use pages::PageExtractor;
pub use plan::{
    AcceptedPart, Cursor, Measured, PageSpan, SplitEstimate, choose_part_range, split_pages,
};
pub use splitter::{
    PartInfo, SplitOutcome, SplitReport, Splitter, is_part_file_name, part_file_name,
};
