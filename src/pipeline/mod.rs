//! Conversion pipeline: page images to a [`Document`](crate::model::Document).

mod builder;
mod options;

pub use builder::{AnalyzedPage, DocumentBuilder};
pub use options::{ConvertOptions, ErrorMode};
