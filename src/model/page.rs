//! Page-level types.

use std::sync::Arc;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::{AssetRef, BBox};

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in pixels
    pub width: u32,

    /// Page height in pixels
    pub height: u32,

    /// Content blocks on the page, top to bottom
    pub blocks: Vec<Block>,

    /// Why the page has no content, when it failed in lenient mode
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,

    /// Rasterized pixels of the page
    #[serde(skip)]
    pub image: Option<Arc<RgbImage>>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: u32, height: u32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            error: None,
            image: None,
        }
    }

    /// Create an empty page from its pixel matrix.
    pub fn from_image(number: u32, image: Arc<RgbImage>) -> Self {
        let mut page = Self::new(number, image.width(), image.height());
        page.image = Some(image);
        page
    }

    /// Create an empty placeholder for a page that could not be processed.
    pub fn failed(number: u32, error: impl Into<String>) -> Self {
        let mut page = Self::new(number, 0, 0);
        page.error = Some(error.into());
        page
    }

    /// Add a block to the page, keeping top-to-bottom order.
    pub fn add_block(&mut self, block: Block) {
        let pos = self.blocks.partition_point(|b| b.bbox.y <= block.bbox.y);
        self.blocks.insert(pos, block);
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(Block::text_content)
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page is empty (no content blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether the page failed and was replaced by a placeholder.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of figure blocks on the page.
    pub fn figure_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_figure()).count()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Kind of content a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Prose recognized by OCR
    Text,
    /// Picture, diagram or anything OCR could not read
    Figure,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Text => write!(f, "text"),
            BlockKind::Figure => write!(f, "figure"),
        }
    }
}

/// Payload of a classified block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockContent {
    /// Recognized tokens, space separated with a trailing space
    Text {
        /// The recognized text
        text: String,
    },
    /// Persisted image asset
    Figure {
        /// Where the region was saved
        asset: AssetRef,
    },
}

/// A classified content band on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Region of the page this block covers
    pub bbox: BBox,

    /// What the region contains
    pub content: BlockContent,
}

impl Block {
    /// Create a text block.
    pub fn text(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            content: BlockContent::Text { text: text.into() },
        }
    }

    /// Create a figure block.
    pub fn figure(bbox: BBox, asset: AssetRef) -> Self {
        Self {
            bbox,
            content: BlockContent::Figure { asset },
        }
    }

    /// Kind of this block.
    pub fn kind(&self) -> BlockKind {
        match self.content {
            BlockContent::Text { .. } => BlockKind::Text,
            BlockContent::Figure { .. } => BlockKind::Figure,
        }
    }

    /// Recognized text, for text blocks.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Text { text } => Some(text),
            BlockContent::Figure { .. } => None,
        }
    }

    /// Asset reference, for figure blocks.
    pub fn asset(&self) -> Option<&AssetRef> {
        match &self.content {
            BlockContent::Figure { asset } => Some(asset),
            BlockContent::Text { .. } => None,
        }
    }

    /// Check if this block is text.
    pub fn is_text(&self) -> bool {
        self.kind() == BlockKind::Text
    }

    /// Check if this block is a figure.
    pub fn is_figure(&self) -> bool {
        self.kind() == BlockKind::Figure
    }
}
