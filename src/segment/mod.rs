//! Page segmentation: pixel matrix to ordered content bands.

mod engine;
mod morphology;
mod options;
mod postprocess;

pub use engine::{adaptive_threshold_mean, kernel_sigma, white_fraction, PageSegmenter, Segmenter};
pub use morphology::{close_rect, dilate_rect, dilate_rect_n, erode_rect, gradient_square};
pub use options::{ContainmentMode, SegmentOptions, HORIZONTAL_POOLING, MIN_TEXT_SIZE};
pub use postprocess::{
    merge_contained_bboxes, merge_contained_bboxes_all, process_bboxes, remove_duplicate_bboxes,
    resolve_overlaps,
};
