//! Summary statistics of a reconstructed document.

use serde::{Deserialize, Serialize};

use crate::model::{BlockContent, Document};

/// Counts collected from an assembled document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Total number of pages
    pub page_count: u32,

    /// Pages replaced by placeholders in lenient mode
    pub failed_page_count: u32,

    /// Number of text blocks
    pub text_block_count: u32,

    /// Number of figure blocks
    pub figure_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for `doc`.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        for page in &doc.pages {
            stats.page_count += 1;
            if page.is_failed() {
                stats.failed_page_count += 1;
            }
            for block in &page.blocks {
                match &block.content {
                    BlockContent::Text { text } => {
                        stats.text_block_count += 1;
                        stats.count_text(text);
                    }
                    BlockContent::Figure { .. } => stats.figure_count += 1,
                }
            }
        }
        stats
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> u32 {
        self.text_block_count + self.figure_count
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &DocumentStats) {
        self.page_count += other.page_count;
        self.failed_page_count += other.failed_page_count;
        self.text_block_count += other.text_block_count;
        self.figure_count += other.figure_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
