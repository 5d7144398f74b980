//! Text-versus-figure classification by OCR confidence.

use image::RgbImage;

use crate::error::Result;
use crate::model::{BBox, BlockKind};

use super::{OcrEngine, OcrToken};

/// Mean confidence a region needs to count as text.
pub const TEXT_CONFIDENCE_THRESHOLD: f64 = 40.0;

/// Options for block classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOptions {
    /// Regions whose mean absolute token confidence exceeds this are text
    pub confidence_threshold: f64,
}

impl ClassifyOptions {
    /// Create classify options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: TEXT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Outcome of classifying one band, before any asset is written.
#[derive(Debug, Clone)]
pub enum Classification {
    /// Recognized prose
    Text(String),
    /// Region pixels, to be persisted as a figure asset
    Figure(RgbImage),
}

impl Classification {
    /// Block kind this classification produces.
    pub fn kind(&self) -> BlockKind {
        match self {
            Classification::Text(_) => BlockKind::Text,
            Classification::Figure(_) => BlockKind::Figure,
        }
    }
}

/// Labels page bands as text or figure.
#[derive(Debug, Clone, Default)]
pub struct BlockClassifier {
    options: ClassifyOptions,
}

impl BlockClassifier {
    /// Create a classifier with the given options.
    pub fn new(options: ClassifyOptions) -> Self {
        Self { options }
    }

    /// Classify the region of `page` covered by `bbox`.
    pub fn classify(
        &self,
        engine: &dyn OcrEngine,
        page: &RgbImage,
        bbox: &BBox,
    ) -> Result<Classification> {
        let region = crop_region(page, bbox);
        let tokens = engine.recognize(&region)?;
        let mean = mean_confidence(&tokens);

        log::debug!(
            "Band {}: {} tokens from {}, mean confidence {:?}",
            bbox,
            tokens.len(),
            engine.name(),
            mean
        );

        Ok(match mean {
            Some(m) if m > self.options.confidence_threshold => {
                Classification::Text(join_tokens(&tokens))
            }
            _ => Classification::Figure(region),
        })
    }
}

/// Copy the pixels under `bbox`, clipped to the page.
pub fn crop_region(page: &RgbImage, bbox: &BBox) -> RgbImage {
    let r = bbox.clamp_to(page.width(), page.height());
    image::imageops::crop_imm(page, r.x, r.y, r.width, r.height).to_image()
}

/// Mean of the absolute token confidences; `None` for no tokens.
pub fn mean_confidence(tokens: &[OcrToken]) -> Option<f64> {
    if tokens.is_empty() {
        return None;
    }
    let sum: f64 = tokens
        .iter()
        .map(|t| f64::from(t.confidence.unsigned_abs()))
        .sum();
    Some(sum / tokens.len() as f64)
}

/// Concatenate token texts, each followed by a single space.
pub fn join_tokens(tokens: &[OcrToken]) -> String {
    let mut text = String::new();
    for token in tokens {
        text.push_str(&token.text);
        text.push(' ');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    struct FixedEngine(Vec<OcrToken>);

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, _region: &RgbImage) -> Result<Vec<OcrToken>> {
            Ok(self.0.clone())
        }
    }

    fn tokens(confs: &[i32]) -> Vec<OcrToken> {
        confs
            .iter()
            .enumerate()
            .map(|(i, c)| OcrToken::new(format!("w{}", i), *c))
            .collect()
    }

    fn classify(confs: &[i32]) -> Classification {
        let page = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        BlockClassifier::default()
            .classify(&FixedEngine(tokens(confs)), &page, &BBox::new(0, 10, 50, 20))
            .unwrap()
    }

    #[test]
    fn test_high_confidence_is_text() {
        match classify(&[90, 85, 95]) {
            Classification::Text(text) => assert_eq!(text, "w0 w1 w2 "),
            other => panic!("expected text, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_low_confidence_is_figure() {
        match classify(&[5, 10, 0]) {
            Classification::Figure(region) => assert_eq!(region.dimensions(), (50, 20)),
            other => panic!("expected figure, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_no_tokens_is_figure() {
        assert_eq!(classify(&[]).kind(), BlockKind::Figure);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(classify(&[40, 40]).kind(), BlockKind::Figure);
        assert_eq!(classify(&[41, 40]).kind(), BlockKind::Text);
    }

    #[test]
    fn test_negative_confidences_count_by_magnitude() {
        assert_eq!(mean_confidence(&tokens(&[-90, 90])), Some(90.0));
        assert_eq!(mean_confidence(&[]), None);
    }

    #[test]
    fn test_join_tokens_trailing_space() {
        assert_eq!(join_tokens(&tokens(&[1])), "w0 ");
        assert_eq!(join_tokens(&[]), "");
    }

    #[test]
    fn test_crop_region_is_clipped() {
        let page = RgbImage::new(30, 30);
        let region = crop_region(&page, &BBox::new(0, 20, 30, 40));
        assert_eq!(region.dimensions(), (30, 10));
    }
}
