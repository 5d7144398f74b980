//! Conversion options and configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::classify::ClassifyOptions;
use crate::model::AssetPolicy;
use crate::segment::SegmentOptions;

/// Options for turning rasterized pages into a document.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to analyze pages in parallel
    pub parallel: bool,

    /// What to do when the asset folder already exists
    pub asset_policy: AssetPolicy,

    /// Segmentation parameters
    pub segment: SegmentOptions,

    /// Classification parameters
    pub classify: ClassifyOptions,

    /// Set to abort the conversion between pages
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ConvertOptions {
    /// Create new convert options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (replace failing pages with empty ones).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the asset folder policy.
    pub fn with_asset_policy(mut self, policy: AssetPolicy) -> Self {
        self.asset_policy = policy;
        self
    }

    /// Allow writing into an existing asset folder.
    pub fn reuse_assets(mut self) -> Self {
        self.asset_policy = AssetPolicy::Reuse;
        self
    }

    /// Set segmentation options.
    pub fn with_segment_options(mut self, options: SegmentOptions) -> Self {
        self.segment = options;
        self
    }

    /// Set classification options.
    pub fn with_classify_options(mut self, options: ClassifyOptions) -> Self {
        self.classify = options;
        self
    }

    /// Share a cancel flag with the caller.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether the cancel flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            asset_policy: AssetPolicy::Exclusive,
            segment: SegmentOptions::default(),
            classify: ClassifyOptions::default(),
            cancel: None,
        }
    }
}

/// Error handling mode for page failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Abort the whole document on any page failure
    #[default]
    Strict,
    /// Replace the failing page with an empty one and continue
    Lenient,
}
