//! Error types for pdf2tex.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf2tex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding or encoding pixel data.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The document's asset folder already exists.
    #[error("Asset folder already exists: {}", .0.display())]
    AssetFolderExists(PathBuf),

    /// The external rasterizer failed.
    #[error("Rasterization error: {0}")]
    Rasterize(String),

    /// The OCR capability failed on a region of a page.
    #[error("OCR error on page {page}: {message}")]
    Ocr {
        /// Page number (1-indexed)
        page: u32,
        /// Capability-reported failure
        message: String,
    },

    /// A page's pixel matrix could not be used.
    #[error("Page {page} is unreadable: {message}")]
    PageDecode {
        /// Page number (1-indexed)
        page: u32,
        /// Decoder-reported failure
        message: String,
    },

    /// Conversion was cancelled through the cancel flag.
    #[error("Conversion cancelled")]
    Cancelled,

    /// Error during rendering (LaTeX, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach a page number to a page-level failure.
    ///
    /// Only [`Error::Ocr`] and [`Error::PageDecode`] carry a page; other
    /// variants pass through unchanged.
    pub fn on_page(self, page: u32) -> Self {
        match self {
            Error::Ocr { message, .. } => Error::Ocr { page, message },
            Error::PageDecode { message, .. } => Error::PageDecode { page, message },
            other => other,
        }
    }
}
