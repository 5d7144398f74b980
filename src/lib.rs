//! # pdf2tex
//!
//! Reconstruct scanned or rendered PDF pages as LaTeX source.
//!
//! Each page is rasterized, split into horizontal content bands, and every
//! band is classified with OCR: readable bands become escaped LaTeX text,
//! the rest are saved as JPEG figures and included with `\includegraphics`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2tex::{convert_file, render};
//!
//! fn main() -> pdf2tex::Result<()> {
//!     // Rasterize, segment and classify (writes figures to ./paperassets)
//!     let doc = convert_file("paper.pdf")?;
//!
//!     // Render to LaTeX
//!     let options = render::RenderOptions::default();
//!     render::write_tex(&doc, "paper.tex", &options)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout segmentation**: morphological band detection on page pixels
//! - **OCR classification**: mean word confidence decides text vs. figure
//! - **Figure assets**: document-wide numbered JPEG files
//! - **Parallel processing**: Uses Rayon to analyze pages concurrently
//! - **Pluggable capabilities**: bring your own rasterizer and OCR engine

pub mod classify;
pub mod detect;
pub mod error;
pub mod latex;
pub mod model;
pub mod pipeline;
pub mod raster;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use classify::{
    BlockClassifier, Classification, ClassifyOptions, OcrEngine, OcrToken, TesseractCli,
};
pub use detect::{
    detect_format_from_bytes, detect_format_from_path, detect_source, is_pdf, list_pdfs,
    PdfFormat, SourceKind,
};
pub use error::{Error, Result};
pub use model::{
    AssetPolicy, AssetRef, AssetStore, BBox, Block, BlockContent, BlockKind, Document, Page,
};
pub use pipeline::{ConvertOptions, DocumentBuilder, ErrorMode};
pub use raster::{
    ImageDirRasterizer, PageSource, PdftoppmRasterizer, RasterPages, Rasterizer, DEFAULT_DPI,
};
pub use render::{DocumentStats, JsonFormat, RenderOptions};
pub use segment::{ContainmentMode, PageSegmenter, SegmentOptions, Segmenter};

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use image::RgbImage;

/// Name of a document derived from its input path (`paper.pdf` -> `paper`).
pub fn document_name<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Asset folder for a document: `<output_dir>/<name>assets`.
pub fn default_asset_dir<P: AsRef<Path>>(output_dir: P, name: &str) -> PathBuf {
    output_dir.as_ref().join(format!("{}assets", name))
}

/// Folder that keeps a document's page renders: `<output_dir>/<name>pages`.
pub fn default_page_dir<P: AsRef<Path>>(output_dir: P, name: &str) -> PathBuf {
    output_dir.as_ref().join(format!("{}pages", name))
}

/// Pick a rasterizer for `path`: a page image directory or a PDF.
///
/// PDF pages are rendered into `page_dir` when given and kept there;
/// otherwise they live in a temporary directory.
pub fn rasterizer_for<P: AsRef<Path>>(
    path: P,
    dpi: u32,
    page_dir: Option<&Path>,
) -> Result<Box<dyn Rasterizer>> {
    match detect_source(path)? {
        SourceKind::ImageDir => Ok(Box::new(ImageDirRasterizer::new())),
        SourceKind::Pdf(_) => {
            let mut rasterizer = PdftoppmRasterizer::new().with_dpi(dpi);
            if let Some(dir) = page_dir {
                rasterizer = rasterizer.with_output_dir(dir);
            }
            Ok(Box::new(rasterizer))
        }
    }
}

/// Convert a PDF or page image directory into a document.
///
/// Uses `pdftoppm` and `tesseract` from `PATH` and writes figures next to the
/// current directory in `<name>assets`.
///
/// # Example
///
/// ```no_run
/// use pdf2tex::convert_file;
///
/// let doc = convert_file("paper.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    Pdf2Tex::new().convert(path).map(|r| r.document)
}

/// Convert a file with custom conversion options.
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<Document> {
    Pdf2Tex::new()
        .with_convert_options(options)
        .convert(path)
        .map(|r| r.document)
}

/// Build a document from page images already in memory.
///
/// # Example
///
/// ```no_run
/// use pdf2tex::{convert_images, ConvertOptions, TesseractCli};
///
/// let page = image::open("scan.png").unwrap().to_rgb8();
/// let ocr = TesseractCli::new();
/// let doc = convert_images("scan", vec![page], "scanassets", &ocr, ConvertOptions::default())?;
/// # Ok::<(), pdf2tex::Error>(())
/// ```
pub fn convert_images<P: AsRef<Path>>(
    name: &str,
    pages: Vec<RgbImage>,
    asset_dir: P,
    engine: &dyn OcrEngine,
    options: ConvertOptions,
) -> Result<Document> {
    let pages: Vec<PageSource> = pages.into_iter().map(PageSource::from).collect();
    DocumentBuilder::new(engine, options).build(name, asset_dir.as_ref(), &pages)
}

/// Convert a file straight to LaTeX source.
///
/// # Example
///
/// ```no_run
/// use pdf2tex::to_tex;
///
/// let tex = to_tex("paper.pdf").unwrap();
/// std::fs::write("paper.tex", tex).unwrap();
/// ```
pub fn to_tex<P: AsRef<Path>>(path: P) -> Result<String> {
    Pdf2Tex::new().convert(path)?.to_tex()
}

/// Convert a file to a JSON layout dump.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    Pdf2Tex::new().convert(path)?.to_json(format)
}

/// Builder for converting documents to LaTeX.
///
/// # Example
///
/// ```no_run
/// use pdf2tex::Pdf2Tex;
///
/// Pdf2Tex::new()
///     .with_output_dir("./out")
///     .with_dpi(300)
///     .lenient()
///     .convert("paper.pdf")?
///     .write_tex("./out/paper.tex")?;
/// # Ok::<(), pdf2tex::Error>(())
/// ```
pub struct Pdf2Tex {
    convert_options: ConvertOptions,
    render_options: RenderOptions,
    output_dir: PathBuf,
    asset_dir: Option<PathBuf>,
    page_dir: Option<PathBuf>,
    dpi: u32,
    ocr: Option<Box<dyn OcrEngine>>,
    rasterizer: Option<Box<dyn Rasterizer>>,
}

impl Pdf2Tex {
    /// Create a new Pdf2Tex builder.
    pub fn new() -> Self {
        Self {
            convert_options: ConvertOptions::default(),
            render_options: RenderOptions::default(),
            output_dir: PathBuf::from("."),
            asset_dir: None,
            page_dir: None,
            dpi: DEFAULT_DPI,
            ocr: None,
            rasterizer: None,
        }
    }

    /// Enable lenient mode.
    pub fn lenient(mut self) -> Self {
        self.convert_options = self.convert_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.convert_options = self.convert_options.sequential();
        self
    }

    /// Allow an existing asset folder.
    pub fn reuse_assets(mut self) -> Self {
        self.convert_options = self.convert_options.reuse_assets();
        self
    }

    /// Omit the preamble from the LaTeX output.
    pub fn without_preamble(mut self) -> Self {
        self.render_options = self.render_options.without_preamble();
        self
    }

    /// Directory the asset folder is created in.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Use an explicit asset folder instead of `<output dir>/<name>assets`.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    /// Keep PDF page renders in `dir` instead of a temporary directory.
    pub fn with_page_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.page_dir = Some(dir.into());
        self
    }

    /// Rasterization resolution for PDFs.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Use a specific OCR engine instead of `tesseract` from `PATH`.
    pub fn with_ocr(mut self, engine: impl OcrEngine + 'static) -> Self {
        self.ocr = Some(Box::new(engine));
        self
    }

    /// Use a specific rasterizer instead of picking one from the input.
    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + 'static) -> Self {
        self.rasterizer = Some(Box::new(rasterizer));
        self
    }

    /// Replace the conversion options.
    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert_options = options;
        self
    }

    /// Set segmentation options.
    pub fn with_segment_options(mut self, options: SegmentOptions) -> Self {
        self.convert_options = self.convert_options.with_segment_options(options);
        self
    }

    /// Set classification options.
    pub fn with_classify_options(mut self, options: ClassifyOptions) -> Self {
        self.convert_options = self.convert_options.with_classify_options(options);
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Share a cancel flag with the caller.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.convert_options = self.convert_options.with_cancel_flag(flag);
        self
    }

    /// Asset folder used for a document named `name`.
    pub fn asset_dir_for(&self, name: &str) -> PathBuf {
        self.asset_dir
            .clone()
            .unwrap_or_else(|| default_asset_dir(&self.output_dir, name))
    }

    /// Rasterize, segment and classify `input`.
    pub fn convert<P: AsRef<Path>>(self, input: P) -> Result<Pdf2TexResult> {
        let input = input.as_ref();
        let name = document_name(input);
        let asset_dir = self.asset_dir_for(&name);

        let rasterizer = match self.rasterizer {
            Some(rasterizer) => rasterizer,
            None => rasterizer_for(input, self.dpi, self.page_dir.as_deref())?,
        };
        log::info!("Rasterizing {} with {}", input.display(), rasterizer.name());
        let pages = rasterizer.rasterize(input)?;

        let ocr: Box<dyn OcrEngine> = match self.ocr {
            Some(engine) => engine,
            None => Box::new(TesseractCli::new()),
        };
        let document = DocumentBuilder::new(ocr.as_ref(), self.convert_options).build(
            &name,
            &asset_dir,
            pages.pages(),
        )?;

        Ok(Pdf2TexResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Pdf2Tex {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of converting a document.
pub struct Pdf2TexResult {
    /// The reconstructed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl Pdf2TexResult {
    /// Convert to LaTeX source.
    pub fn to_tex(&self) -> Result<String> {
        render::to_tex(&self.document, &self.render_options)
    }

    /// Write LaTeX source to `path`.
    pub fn write_tex<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        render::write_tex(&self.document, path, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Summary statistics.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::from_document(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoText;

    impl OcrEngine for NoText {
        fn name(&self) -> &str {
            "no-text"
        }

        fn recognize(&self, _region: &RgbImage) -> Result<Vec<OcrToken>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_pdf2tex_builder() {
        let builder = Pdf2Tex::new().lenient().sequential().without_preamble();

        assert_eq!(builder.convert_options.error_mode, ErrorMode::Lenient);
        assert!(!builder.convert_options.parallel);
        assert!(!builder.render_options.include_preamble);
    }

    #[test]
    fn test_pdf2tex_builder_default() {
        let builder = Pdf2Tex::default();
        assert!(builder.render_options.include_preamble);
        assert_eq!(builder.dpi, DEFAULT_DPI);
        assert_eq!(builder.convert_options.asset_policy, AssetPolicy::Exclusive);
    }

    #[test]
    fn test_asset_dir_for() {
        let builder = Pdf2Tex::new().with_output_dir("/out").with_page_dir("/out/paperpages");
        assert_eq!(builder.asset_dir_for("paper"), PathBuf::from("/out/paperassets"));
        assert_eq!(builder.page_dir.as_deref(), Some(Path::new("/out/paperpages")));

        let builder = builder.with_asset_dir("/figs");
        assert_eq!(builder.asset_dir_for("paper"), PathBuf::from("/figs"));
    }

    #[test]
    fn test_document_name() {
        assert_eq!(document_name("dir/paper.pdf"), "paper");
        assert_eq!(document_name("scans"), "scans");
        assert_eq!(document_name(""), "document");
    }

    #[test]
    fn test_rasterizer_for() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(rasterizer_for(tmp.path(), 150, None).unwrap().name(), "image-dir");

        let pdf = tmp.path().join("a.pdf");
        std::fs::write(&pdf, b"%PDF-1.5\n").unwrap();
        assert_eq!(rasterizer_for(&pdf, 150, None).unwrap().name(), "pdftoppm");
        let keep = default_page_dir(tmp.path(), "a");
        assert_eq!(
            rasterizer_for(&pdf, 150, Some(keep.as_path())).unwrap().name(),
            "pdftoppm"
        );

        let html = tmp.path().join("a.html");
        std::fs::write(&html, b"<html>").unwrap();
        assert!(matches!(rasterizer_for(&html, 150, None), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_default_page_dir() {
        assert_eq!(default_page_dir("/out", "paper"), PathBuf::from("/out/paperpages"));
    }

    #[test]
    fn test_convert_image_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let pages = tmp.path().join("scan");
        std::fs::create_dir(&pages).unwrap();
        RgbImage::from_pixel(60, 60, image::Rgb([255, 255, 255]))
            .save(pages.join("page-1.png"))
            .unwrap();

        let result = Pdf2Tex::new()
            .with_output_dir(tmp.path())
            .with_ocr(NoText)
            .convert(&pages)
            .unwrap();

        assert_eq!(result.document.page_count(), 1);
        assert!(tmp.path().join("scanassets").is_dir());
        assert!(result.to_tex().unwrap().contains("\\begin{document}"));
        assert_eq!(result.stats().page_count, 1);
    }

    #[test]
    fn test_convert_rejects_non_pdf() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let result = Pdf2Tex::new().with_ocr(NoText).convert(&path);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
