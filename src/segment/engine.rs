//! Page segmentation into full-width content bands.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::filter::{box_filter, gaussian_blur_f32};

use crate::model::BBox;

use super::morphology::{close_rect, dilate_rect_n, gradient_square};
use super::postprocess::process_bboxes;
use super::SegmentOptions;

/// Source of raw candidate bands for a page.
///
/// Implementations return full-width bands sorted by ascending `y`; cleanup
/// is applied afterwards by [`process_bboxes`].
pub trait PageSegmenter: Send + Sync {
    /// Raw candidate bands of `page`.
    fn segment(&self, page: &RgbImage) -> Vec<BBox>;
}

/// Finds content bands on a rasterized page.
///
/// The pipeline binarizes the page with a mean adaptive threshold, smooths
/// it, outlines strokes with a morphological gradient, fuses characters into
/// lines with a wide close, merges lines into paragraphs by dilation and
/// takes the bounding rectangle of each outer contour. Only the vertical
/// extent of a region is kept; every band spans the full page width.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    options: SegmentOptions,
}

impl Segmenter {
    /// Create a segmenter with the given options.
    pub fn new(options: SegmentOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// Raw candidate bands of `page`, sorted by ascending `y`.
    ///
    /// Bands may repeat, nest or overlap; see [`Segmenter::find_content_blocks`].
    /// A blank page yields no bands.
    pub fn segment(&self, page: &RgbImage) -> Vec<BBox> {
        let (page_width, page_height) = page.dimensions();
        if page_width == 0 || page_height == 0 {
            return Vec::new();
        }

        let mask = self.content_mask(&image::imageops::grayscale(page));
        let contours = find_contours::<u32>(&mask);

        let mut bboxes: Vec<BBox> = contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(|c| bounding_rect(c.points.iter().map(|p| (p.x, p.y))))
            .filter(|bbox| bbox.height >= self.options.min_text_size)
            .filter(|bbox| white_fraction(page, bbox) < self.options.max_white_fraction)
            .map(|bbox| BBox::new(0, bbox.y, page_width, bbox.height))
            .collect();

        bboxes.sort_by_key(|bbox| bbox.y);

        log::debug!(
            "Segmented {}x{} page: {} outer contours, {} candidate bands",
            page_width,
            page_height,
            contours.len(),
            bboxes.len()
        );

        bboxes
    }

    /// Cleaned, non-overlapping bands of `page`, sorted by ascending `y`.
    pub fn find_content_blocks(&self, page: &RgbImage) -> Vec<BBox> {
        process_bboxes(self.segment(page), self.options.containment)
    }

    /// Binary-ish mask whose non-zero regions are content blobs.
    pub fn content_mask(&self, gray: &GrayImage) -> GrayImage {
        let o = &self.options;

        let binary = adaptive_threshold_mean(gray, o.threshold_block_size, o.threshold_offset);
        let smooth = gaussian_blur_f32(&binary, kernel_sigma(o.blur_kernel));
        let edges = gradient_square(&smooth, o.gradient_kernel);
        let lines = close_rect(&edges, o.horizontal_pooling, o.close_height);
        dilate_rect_n(&lines, o.dilate_kernel, o.dilate_kernel, o.dilate_iterations)
    }
}

impl PageSegmenter for Segmenter {
    fn segment(&self, page: &RgbImage) -> Vec<BBox> {
        Segmenter::segment(self, page)
    }
}

/// Binarize with a mean-based local threshold.
///
/// A pixel becomes white when it is brighter than the mean of its
/// `block_size` x `block_size` neighbourhood minus `offset`.
pub fn adaptive_threshold_mean(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let radius = block_size / 2;
    let mean = box_filter(gray, radius, radius);

    let mut out = GrayImage::new(gray.width(), gray.height());
    for ((dst, src), m) in out.pixels_mut().zip(gray.pixels()).zip(mean.pixels()) {
        let threshold = i32::from(m.0[0]) - offset;
        *dst = if i32::from(src.0[0]) > threshold {
            Luma([255])
        } else {
            Luma([0])
        };
    }
    out
}

/// Gaussian sigma implied by a kernel size when none is given.
pub fn kernel_sigma(kernel_size: u32) -> f32 {
    let k = kernel_size.max(1) as f32;
    0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
}

/// Fraction of pixels inside `bbox` whose channels are all 255.
pub fn white_fraction(page: &RgbImage, bbox: &BBox) -> f64 {
    let region = bbox.clamp_to(page.width(), page.height());
    if region.is_empty() {
        return 0.0;
    }

    let mut white = 0u64;
    for y in region.y..region.y_bottom() {
        for x in region.x..region.x_right() {
            if page.get_pixel(x, y).0 == [255, 255, 255] {
                white += 1;
            }
        }
    }
    white as f64 / region.area() as f64
}

/// Axis-aligned rectangle enclosing all points, inclusive of the last pixel.
fn bounding_rect(points: impl Iterator<Item = (u32, u32)>) -> Option<BBox> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y) in points {
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| BBox::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}
