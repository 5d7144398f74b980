//! Segmentation parameters.

/// Smallest band height kept as content, in pixels.
pub const MIN_TEXT_SIZE: u32 = 10;

/// Width of the closing element that fuses characters along a line.
pub const HORIZONTAL_POOLING: u32 = 25;

/// Options for page segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOptions {
    /// Bands shorter than this are dropped
    pub min_text_size: u32,

    /// Width of the horizontal closing element
    pub horizontal_pooling: u32,

    /// Height of the horizontal closing element
    pub close_height: u32,

    /// Neighbourhood size of the mean adaptive threshold (odd)
    pub threshold_block_size: u32,

    /// Constant subtracted from the local mean before thresholding
    pub threshold_offset: i32,

    /// Size of the Gaussian smoothing kernel (odd)
    pub blur_kernel: u32,

    /// Size of the square morphological-gradient element (odd)
    pub gradient_kernel: u32,

    /// Size of the square dilation element
    pub dilate_kernel: u32,

    /// Number of dilation passes
    pub dilate_iterations: u32,

    /// A band is kept only while its pure-white pixel fraction is below this;
    /// the default of 1.0 drops only bands that are entirely white
    pub max_white_fraction: f64,

    /// How nested rectangles are merged
    pub containment: ContainmentMode,
}

impl SegmentOptions {
    /// Create segment options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum band height.
    pub fn with_min_text_size(mut self, size: u32) -> Self {
        self.min_text_size = size;
        self
    }

    /// Set the horizontal pooling width.
    pub fn with_horizontal_pooling(mut self, width: u32) -> Self {
        self.horizontal_pooling = width.max(1);
        self
    }

    /// Set the adaptive threshold neighbourhood and offset.
    pub fn with_threshold(mut self, block_size: u32, offset: i32) -> Self {
        self.threshold_block_size = block_size | 1;
        self.threshold_offset = offset;
        self
    }

    /// Set the dilation element size and pass count.
    pub fn with_dilation(mut self, kernel: u32, iterations: u32) -> Self {
        self.dilate_kernel = kernel.max(1);
        self.dilate_iterations = iterations;
        self
    }

    /// Set the white-pixel fraction limit of the density filter.
    pub fn with_max_white_fraction(mut self, fraction: f64) -> Self {
        self.max_white_fraction = fraction;
        self
    }

    /// Set the containment merge mode.
    pub fn with_containment(mut self, mode: ContainmentMode) -> Self {
        self.containment = mode;
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            min_text_size: MIN_TEXT_SIZE,
            horizontal_pooling: HORIZONTAL_POOLING,
            close_height: 5,
            threshold_block_size: 11,
            threshold_offset: 5,
            blur_kernel: 7,
            gradient_kernel: 5,
            dilate_kernel: 10,
            dilate_iterations: 2,
            max_white_fraction: 1.0,
            containment: ContainmentMode::ForwardPass,
        }
    }
}

/// Strategy for dropping rectangles nested inside other rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainmentMode {
    /// Single left-to-right pass; only already-kept rectangles can absorb later ones
    #[default]
    ForwardPass,
    /// Drop every rectangle strictly inside any other, whatever the scan order
    OrderIndependent,
}
