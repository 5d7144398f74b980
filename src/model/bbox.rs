//! Axis-aligned bounding rectangles.

use serde::{Deserialize, Serialize};

/// Bounding rectangle of a content region, in page pixels.
///
/// `(x, y)` is the top-left corner. The bottom edge is always derived from
/// `y + height`; moving an edge goes through [`BBox::set_top`] or
/// [`BBox::set_bottom`], which keep the opposite edge fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl BBox {
    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a full-width band spanning rows `y..y_bottom`.
    pub fn band(y: u32, y_bottom: u32, page_width: u32) -> Self {
        Self::new(0, y, page_width, y_bottom.saturating_sub(y))
    }

    /// Y coordinate of the bottom edge (exclusive).
    pub const fn y_bottom(&self) -> u32 {
        self.y + self.height
    }

    /// X coordinate of the right edge (exclusive).
    pub const fn x_right(&self) -> u32 {
        self.x + self.width
    }

    /// Move the top edge, keeping the bottom edge where it is.
    pub fn set_top(&mut self, y: u32) {
        let bottom = self.y_bottom();
        self.y = y.min(bottom);
        self.height = bottom - self.y;
    }

    /// Move the bottom edge, keeping the top edge where it is.
    pub fn set_bottom(&mut self, y_bottom: u32) {
        self.height = y_bottom.saturating_sub(self.y);
    }

    /// Number of pixels covered.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `other` lies strictly inside this rectangle's vertical span.
    pub const fn strictly_contains_vertically(&self, other: &BBox) -> bool {
        other.y > self.y && other.y_bottom() < self.y_bottom()
    }

    /// Whether this rectangle's bottom edge runs past the top of `next`.
    pub const fn overlaps_next(&self, next: &BBox) -> bool {
        self.y_bottom() > next.y
    }

    /// Clip the rectangle to an image of the given dimensions.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self::new(
            x,
            y,
            self.x_right().min(width) - x,
            self.y_bottom().min(height) - y,
        )
    }
}

impl std::fmt::Display for BBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[x={}, y={}..{}, w={}]",
            self.x,
            self.y,
            self.y_bottom(),
            self.width
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_is_derived() {
        let bbox = BBox::new(0, 30, 100, 40);
        assert_eq!(bbox.y_bottom(), 70);
        assert_eq!(bbox.x_right(), 100);
    }

    #[test]
    fn test_set_edges_keep_opposite_edge() {
        let mut bbox = BBox::new(0, 40, 100, 50);
        bbox.set_top(45);
        assert_eq!(bbox.y, 45);
        assert_eq!(bbox.y_bottom(), 90);
        assert_eq!(bbox.height, 45);

        let mut bbox = BBox::new(0, 0, 100, 50);
        bbox.set_bottom(45);
        assert_eq!(bbox.y, 0);
        assert_eq!(bbox.y_bottom(), 45);
    }

    #[test]
    fn test_set_top_past_bottom_collapses() {
        let mut bbox = BBox::new(0, 10, 5, 5);
        bbox.set_top(40);
        assert_eq!(bbox.y, 15);
        assert!(bbox.is_empty());
    }

    #[test]
    fn test_strict_vertical_containment() {
        let outer = BBox::new(0, 0, 10, 100);
        assert!(outer.strictly_contains_vertically(&BBox::new(0, 10, 10, 20)));
        // Sharing an edge is not strict containment
        assert!(!outer.strictly_contains_vertically(&BBox::new(0, 0, 10, 20)));
        assert!(!outer.strictly_contains_vertically(&BBox::new(0, 80, 10, 20)));
    }

    #[test]
    fn test_clamp_to_image() {
        let bbox = BBox::new(5, 90, 200, 40).clamp_to(100, 100);
        assert_eq!(bbox, BBox::new(5, 90, 95, 10));
    }
}
