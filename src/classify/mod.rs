//! Block classification: page band to text or figure.

mod classifier;
mod ocr;

pub use classifier::{
    crop_region, join_tokens, mean_confidence, BlockClassifier, Classification, ClassifyOptions,
    TEXT_CONFIDENCE_THRESHOLD,
};
pub use ocr::{parse_tsv, parse_tsv_all_levels, OcrEngine, OcrToken, TesseractCli};
