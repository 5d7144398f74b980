//! Rasterization: paginated source to per-page pixel matrices.
//!
//! Rasterizing is delegated to external tools; this module wraps them behind
//! the [`Rasterizer`] trait so the pipeline only sees [`PageSource`]s.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};

use image::RgbImage;
use regex::Regex;
use tempfile::TempDir;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};

/// Default rendering resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 200;

/// One page's pixels, decoded now or on demand.
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Already decoded pixels
    Pixels(Arc<RgbImage>),
    /// Image file decoded when the page is processed
    File(PathBuf),
}

impl PageSource {
    /// Decode the page into an RGB pixel matrix.
    pub fn load(&self) -> Result<Arc<RgbImage>> {
        match self {
            PageSource::Pixels(img) => Ok(Arc::clone(img)),
            PageSource::File(path) => {
                let img = image::open(path)?;
                Ok(Arc::new(img.to_rgb8()))
            }
        }
    }
}

impl From<RgbImage> for PageSource {
    fn from(img: RgbImage) -> Self {
        PageSource::Pixels(Arc::new(img))
    }
}

/// Rasterized pages of one source, in page order.
///
/// Holds on to any scratch directory the pages were written to, so file
/// sources stay readable for as long as this value lives.
#[derive(Debug)]
pub struct RasterPages {
    pages: Vec<PageSource>,
    _scratch: Option<TempDir>,
}

impl RasterPages {
    /// Wrap pages that need no scratch space.
    pub fn new(pages: Vec<PageSource>) -> Self {
        Self {
            pages,
            _scratch: None,
        }
    }

    fn with_scratch(pages: Vec<PageSource>, scratch: TempDir) -> Self {
        Self {
            pages,
            _scratch: Some(scratch),
        }
    }

    /// Pages in source order.
    pub fn pages(&self) -> &[PageSource] {
        &self.pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether there are no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl From<Vec<RgbImage>> for RasterPages {
    fn from(images: Vec<RgbImage>) -> Self {
        Self::new(images.into_iter().map(PageSource::from).collect())
    }
}

/// Turns a paginated source into page images.
pub trait Rasterizer: Send + Sync {
    /// Rasterizer name for logging.
    fn name(&self) -> &str;

    /// Produce the pages of `source` in order.
    fn rasterize(&self, source: &Path) -> Result<RasterPages>;
}

/// Treats a directory of page images as the rasterized document.
///
/// Files are ordered by the last number in their name (`page-2` before
/// `page-10`), then by name.
#[derive(Debug, Clone, Default)]
pub struct ImageDirRasterizer;

impl ImageDirRasterizer {
    /// Create a new directory rasterizer.
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for ImageDirRasterizer {
    fn name(&self) -> &str {
        "image-dir"
    }

    fn rasterize(&self, source: &Path) -> Result<RasterPages> {
        let pages = list_page_images(source)?
            .into_iter()
            .map(PageSource::File)
            .collect();
        Ok(RasterPages::new(pages))
    }
}

/// Rasterizes PDFs with poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
    dpi: u32,
    output_dir: Option<PathBuf>,
}

impl PdftoppmRasterizer {
    /// Use `pdftoppm` from `PATH` at the default resolution.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("pdftoppm"),
            dpi: DEFAULT_DPI,
            output_dir: None,
        }
    }

    /// Use a specific pdftoppm binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the rendering resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.max(1);
        self
    }

    /// Keep page images in `dir` instead of a temporary directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn name(&self) -> &str {
        "pdftoppm"
    }

    fn rasterize(&self, source: &Path) -> Result<RasterPages> {
        let format = detect_format_from_path(source)?;
        log::info!(
            "Rasterizing {} ({}) at {} dpi",
            source.display(),
            format,
            self.dpi
        );

        let (dir, scratch) = match self.output_dir {
            Some(ref dir) => {
                fs::create_dir_all(dir)?;
                (dir.clone(), None)
            }
            None => {
                let tmp = tempfile::Builder::new().prefix("pdf2tex-pages").tempdir()?;
                (tmp.path().to_path_buf(), Some(tmp))
            }
        };

        let output = Command::new(&self.binary)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(source)
            .arg(dir.join("page"))
            .output()
            .map_err(|e| {
                Error::Rasterize(format!("failed to start {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(Error::Rasterize(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let pages: Vec<PageSource> = list_page_images(&dir)?
            .into_iter()
            .map(PageSource::File)
            .collect();
        if pages.is_empty() {
            return Err(Error::Rasterize(format!(
                "pdftoppm produced no pages for {}",
                source.display()
            )));
        }

        Ok(match scratch {
            Some(tmp) => RasterPages::with_scratch(pages, tmp),
            None => RasterPages::new(pages),
        })
    }
}

fn page_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\D*$").expect("valid page number pattern"))
}

/// Page number embedded in a file stem, if any.
pub fn page_number_of(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    page_number_pattern()
        .captures(stem)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether `path` has an image extension the decoder understands.
pub fn is_page_image(path: &Path) -> bool {
    path.is_file() && image::ImageFormat::from_path(path).is_ok()
}

/// Image files in `dir`, ordered by embedded page number then name.
pub fn list_page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_page_image(path))
        .collect();

    files.sort_by(|a, b| {
        page_number_of(a)
            .cmp(&page_number_of(b))
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });

    Ok(files)
}
