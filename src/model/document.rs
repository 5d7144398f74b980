//! Document-level types.

use std::path::Path;

use serde::Serialize;

use super::{AssetStore, Block, Page};

/// A reconstructed document: pages in source order plus the shared asset store.
#[derive(Debug, Serialize)]
pub struct Document {
    /// Document name, used for the asset folder and output file
    pub name: String,

    /// Pages in the document
    pub pages: Vec<Page>,

    /// Figure assets and the document-wide figure counter
    pub assets: AssetStore,
}

impl Document {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>, assets: AssetStore) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
            assets,
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Folder holding the figure assets.
    pub fn asset_dir(&self) -> &Path {
        self.assets.dir()
    }

    /// Number of figure assets persisted so far.
    pub fn figure_count(&self) -> usize {
        self.assets.figure_count()
    }

    /// All blocks in reading order: pages in order, blocks within a page in order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|page| page.blocks.iter())
    }

    /// Pages that failed and were replaced by placeholders.
    pub fn failed_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|page| page.is_failed())
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
