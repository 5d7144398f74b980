//! Benchmarks for pdf2tex segmentation performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run segmentation and band cleanup on synthetic pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use pdf2tex::segment::{process_bboxes, ContainmentMode, Segmenter};
use pdf2tex::BBox;

/// Creates a synthetic page with `lines` rows of dark "words" and one block figure.
fn create_test_page(width: u32, height: u32, lines: u32) -> RgbImage {
    let mut page = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    let margin = width / 10;

    for line in 0..lines {
        let y0 = margin + line * 30;
        if y0 + 12 >= height / 2 {
            break;
        }
        let mut x = margin;
        while x + 40 < width - margin {
            for y in y0..y0 + 12 {
                for dx in 0..(20 + (x + line * 7) % 25) {
                    page.put_pixel(x + dx, y, Rgb([20, 20, 20]));
                }
            }
            x += 60;
        }
    }

    // Figure in the lower half
    for y in height / 2 + 40..height / 2 + 240 {
        for x in margin..width - margin {
            page.put_pixel(x, y, Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        }
    }

    page
}

/// Messy raw bands: duplicates, nesting and overlaps.
fn create_raw_bands(count: u32, width: u32) -> Vec<BBox> {
    let mut bands = Vec::with_capacity(count as usize * 2);
    for i in 0..count {
        let y = i * 37;
        bands.push(BBox::new(0, y, width, 30 + i % 20));
        if i % 3 == 0 {
            bands.push(BBox::new(0, y, width, 10));
        }
        if i % 5 == 0 {
            bands.push(BBox::new(0, y + 2, width, 5));
        }
    }
    bands
}

/// Benchmark full-page segmentation at various sizes.
fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    group.sample_size(10);

    for (width, height) in [(850, 1100), (1700, 2200)] {
        let page = create_test_page(width, height, 25);
        let segmenter = Segmenter::default();

        group.bench_function(format!("{}x{}", width, height), |b| {
            b.iter(|| segmenter.find_content_blocks(black_box(&page)));
        });
    }

    group.finish();
}

/// Benchmark band cleanup.
fn bench_postprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("postprocess");

    for count in [50, 500] {
        let bands = create_raw_bands(count, 1700);

        group.bench_function(format!("forward_{}", count), |b| {
            b.iter(|| process_bboxes(black_box(bands.clone()), ContainmentMode::ForwardPass));
        });
        group.bench_function(format!("order_independent_{}", count), |b| {
            b.iter(|| process_bboxes(black_box(bands.clone()), ContainmentMode::OrderIndependent));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_postprocess);
criterion_main!(benches);
