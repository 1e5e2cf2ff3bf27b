//! Building PDFs from page images.

pub mod builder;

pub use builder::{DocumentBuilder, PageImage};
