//! Grayscale morphology with rectangular structuring elements.
//!
//! Thin wrappers over `imageproc::morphology` that build a `width` x `height`
//! rectangular [`Mask`] anchored at `(width / 2, height / 2)`. Pixels outside
//! the image are ignored.

use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_close, grayscale_dilate, grayscale_erode, Mask};

/// Largest mask side `Mask::from_image` accepts.
const MAX_MASK_SIDE: u32 = 511;

/// Rectangular structuring element.
pub fn rect_mask(width: u32, height: u32) -> Mask {
    let width = width.clamp(1, MAX_MASK_SIDE);
    let height = height.clamp(1, MAX_MASK_SIDE);
    let element = GrayImage::from_pixel(width, height, Luma([255]));
    Mask::from_image(&element, (width / 2) as u8, (height / 2) as u8)
}

/// Dilate with a `width` x `height` rectangle.
pub fn dilate_rect(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    grayscale_dilate(image, &rect_mask(width, height))
}

/// Erode with a `width` x `height` rectangle.
pub fn erode_rect(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    grayscale_erode(image, &rect_mask(width, height))
}

/// Morphological close: dilate, then erode with the same rectangle.
pub fn close_rect(image: &GrayImage, width: u32, height: u32) -> GrayImage {
    grayscale_close(image, &rect_mask(width, height))
}

/// Morphological gradient with a `size` x `size` square.
///
/// Each pixel becomes the spread between the brightest and darkest value in
/// its neighbourhood, which outlines stroke edges.
pub fn gradient_square(image: &GrayImage, size: u32) -> GrayImage {
    let mask = rect_mask(size, size);
    let mut dilated = grayscale_dilate(image, &mask);
    let eroded = grayscale_erode(image, &mask);
    for (d, e) in dilated.pixels_mut().zip(eroded.pixels()) {
        d.0[0] = d.0[0].saturating_sub(e.0[0]);
    }
    dilated
}

/// Apply [`dilate_rect`] `iterations` times.
pub fn dilate_rect_n(image: &GrayImage, width: u32, height: u32, iterations: u32) -> GrayImage {
    let mask = rect_mask(width, height);
    let mut out = image.clone();
    for _ in 0..iterations {
        out = grayscale_dilate(&out, &mask);
    }
    out
}
