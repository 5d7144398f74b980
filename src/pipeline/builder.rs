//! Document assembly from rasterized pages.

use std::path::Path;
use std::sync::Arc;

use image::RgbImage;
use rayon::prelude::*;

use crate::classify::{BlockClassifier, Classification, OcrEngine};
use crate::error::{Error, Result};
use crate::model::{AssetStore, BBox, Block, Document, Page};
use crate::raster::PageSource;
use crate::segment::{process_bboxes, PageSegmenter, Segmenter};

use super::options::{ConvertOptions, ErrorMode};

/// A page after segmentation and classification, before figures are saved.
#[derive(Debug)]
pub struct AnalyzedPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// The page's pixels
    pub image: Arc<RgbImage>,
    /// Clean bands in reading order with their classification
    pub regions: Vec<(BBox, Classification)>,
}

/// Builds a [`Document`] from page images.
///
/// Segmentation and classification of each page only look at that page, so
/// pages (and bands within a page) may be analyzed in parallel. Figures are
/// then written page by page, block by block, so asset ids follow reading
/// order across the whole document.
pub struct DocumentBuilder<'a> {
    engine: &'a dyn OcrEngine,
    segmenter: Box<dyn PageSegmenter + 'a>,
    classifier: BlockClassifier,
    options: ConvertOptions,
}

impl<'a> DocumentBuilder<'a> {
    /// Create a builder that reads regions with `engine`.
    pub fn new(engine: &'a dyn OcrEngine, options: ConvertOptions) -> Self {
        Self {
            engine,
            segmenter: Box::new(Segmenter::new(options.segment.clone())),
            classifier: BlockClassifier::new(options.classify.clone()),
            options,
        }
    }

    /// Replace the segmentation engine.
    pub fn with_segmenter(mut self, segmenter: impl PageSegmenter + 'a) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Build a document named `name` from `pages`, writing figures to `asset_dir`.
    pub fn build(&self, name: &str, asset_dir: &Path, pages: &[PageSource]) -> Result<Document> {
        let assets = AssetStore::create(asset_dir, self.options.asset_policy)?;
        let mut document = Document::new(name, assets);

        log::info!(
            "Building '{}' from {} pages ({}, OCR: {})",
            name,
            pages.len(),
            if self.options.parallel {
                "parallel"
            } else {
                "sequential"
            },
            self.engine.name()
        );

        let analyzed = self.analyze_all(pages);

        for (index, result) in analyzed.into_iter().enumerate() {
            if self.options.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let number = index as u32 + 1;
            let page = match result.and_then(|a| self.assemble(a, &document.assets)) {
                Ok(page) => page,
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => {
                    let e = e.on_page(number);
                    match self.options.error_mode {
                        ErrorMode::Strict => return Err(e),
                        ErrorMode::Lenient => {
                            log::warn!("Replacing page {} with an empty page: {}", number, e);
                            Page::failed(number, e.to_string())
                        }
                    }
                }
            };
            document.add_page(page);
        }

        log::info!(
            "Built '{}': {} pages, {} blocks, {} figures",
            name,
            document.page_count(),
            document.blocks().count(),
            document.figure_count()
        );

        Ok(document)
    }

    fn analyze_all(&self, pages: &[PageSource]) -> Vec<Result<AnalyzedPage>> {
        let run = |(index, source): (usize, &PageSource)| {
            let number = index as u32 + 1;
            self.analyze_page(number, source)
        };

        if self.options.parallel {
            pages.par_iter().enumerate().map(run).collect()
        } else {
            pages.iter().enumerate().map(run).collect()
        }
    }

    /// Load, segment and classify one page.
    pub fn analyze_page(&self, number: u32, source: &PageSource) -> Result<AnalyzedPage> {
        if self.options.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let image = source.load().map_err(|e| Error::PageDecode {
            page: number,
            message: e.to_string(),
        })?;

        self.analyze_image(number, image)
    }

    /// Segment and classify an already decoded page.
    pub fn analyze_image(&self, number: u32, image: Arc<RgbImage>) -> Result<AnalyzedPage> {
        let raw = self.segmenter.segment(&image);
        let bands = process_bboxes(raw, self.options.segment.containment);

        let classify = |bbox: &BBox| {
            self.classifier
                .classify(self.engine, &image, bbox)
                .map(|c| (*bbox, c))
                .map_err(|e| e.on_page(number))
        };

        let regions = if self.options.parallel {
            bands.par_iter().map(classify).collect::<Result<Vec<_>>>()?
        } else {
            bands.iter().map(classify).collect::<Result<Vec<_>>>()?
        };

        log::debug!(
            "Page {}: {} bands, {} text, {} figure",
            number,
            regions.len(),
            regions
                .iter()
                .filter(|(_, c)| matches!(c, Classification::Text(_)))
                .count(),
            regions
                .iter()
                .filter(|(_, c)| matches!(c, Classification::Figure(_)))
                .count()
        );

        Ok(AnalyzedPage {
            number,
            image,
            regions,
        })
    }

    /// Turn an analyzed page into a [`Page`], saving its figures to `assets`.
    pub fn assemble(&self, analyzed: AnalyzedPage, assets: &AssetStore) -> Result<Page> {
        let mut page = Page::from_image(analyzed.number, analyzed.image);
        for (bbox, classification) in analyzed.regions {
            let block = match classification {
                Classification::Text(text) => Block::text(bbox, text),
                Classification::Figure(region) => Block::figure(bbox, assets.persist(&region)?),
            };
            page.blocks.push(block);
        }
        Ok(page)
    }

    /// Analyze and assemble one page in a single step.
    pub fn build_page(
        &self,
        number: u32,
        image: Arc<RgbImage>,
        assets: &AssetStore,
    ) -> Result<Page> {
        let analyzed = self.analyze_image(number, image)?;
        self.assemble(analyzed, assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::OcrToken;
    use crate::model::AssetPolicy;
    use image::Rgb;

    /// Bands fixed per page height, so tests control segmentation.
    struct FixedBands(Vec<BBox>);

    impl PageSegmenter for FixedBands {
        fn segment(&self, _page: &RgbImage) -> Vec<BBox> {
            self.0.clone()
        }
    }

    /// Reads pure-black regions as figures and anything else as text.
    struct DarkIsFigure;

    impl OcrEngine for DarkIsFigure {
        fn name(&self) -> &str {
            "dark-is-figure"
        }

        fn recognize(&self, region: &RgbImage) -> Result<Vec<OcrToken>> {
            if region.pixels().all(|p| p.0 == [0, 0, 0]) {
                Ok(Vec::new())
            } else {
                Ok(vec![OcrToken::new("words", 95)])
            }
        }
    }

    fn page_image() -> RgbImage {
        let mut img = RgbImage::from_pixel(40, 100, Rgb([250, 250, 250]));
        for y in 30..70 {
            for x in 0..40 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        img
    }

    #[test]
    fn test_build_page_applies_cleanup_and_classifies() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = AssetStore::create(tmp.path().join("a"), AssetPolicy::Exclusive).unwrap();

        let engine = DarkIsFigure;
        let builder = DocumentBuilder::new(&engine, ConvertOptions::new().sequential())
            .with_segmenter(FixedBands(vec![
                BBox::new(0, 0, 40, 20),
                BBox::new(0, 0, 40, 15),
                BBox::new(0, 30, 40, 40),
            ]));

        let page = builder
            .build_page(1, Arc::new(page_image()), &assets)
            .unwrap();

        assert_eq!(page.block_count(), 2);
        assert!(page.blocks[0].is_text());
        assert_eq!(page.blocks[0].bbox, BBox::new(0, 0, 40, 20));
        assert!(page.blocks[1].is_figure());
        assert_eq!(page.blocks[1].asset().map(|a| a.id), Some(0));
    }

    #[test]
    fn test_undecodable_page_strict_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = DarkIsFigure;
        let builder = DocumentBuilder::new(&engine, ConvertOptions::new());

        let pages = vec![
            PageSource::from(page_image()),
            PageSource::File(tmp.path().join("missing.png")),
        ];
        let result = builder.build("doc", &tmp.path().join("docassets"), &pages);
        assert!(matches!(result, Err(Error::PageDecode { page: 2, .. })));
    }

    #[test]
    fn test_undecodable_page_lenient_is_isolated() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = DarkIsFigure;
        let builder = DocumentBuilder::new(&engine, ConvertOptions::new().lenient());

        let pages = vec![
            PageSource::File(tmp.path().join("missing.png")),
            PageSource::from(page_image()),
        ];
        let doc = builder
            .build("doc", &tmp.path().join("docassets"), &pages)
            .unwrap();

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].is_failed());
        assert!(!doc.pages[1].is_failed());
        assert_eq!(doc.failed_pages().count(), 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        use std::sync::atomic::AtomicBool;

        let tmp = tempfile::tempdir().unwrap();
        let engine = DarkIsFigure;
        let options = ConvertOptions::new()
            .lenient()
            .with_cancel_flag(Arc::new(AtomicBool::new(true)));
        let builder = DocumentBuilder::new(&engine, options);

        let pages = vec![PageSource::from(page_image())];
        let result = builder.build("doc", &tmp.path().join("docassets"), &pages);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_existing_asset_folder_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("docassets");
        std::fs::create_dir(&dir).unwrap();

        let engine = DarkIsFigure;
        let builder = DocumentBuilder::new(&engine, ConvertOptions::new());
        let result = builder.build("doc", &dir, &[]);
        assert!(matches!(result, Err(Error::AssetFolderExists(_))));

        let builder = DocumentBuilder::new(&engine, ConvertOptions::new().reuse_assets());
        assert!(builder.build("doc", &dir, &[]).is_ok());
    }
}
