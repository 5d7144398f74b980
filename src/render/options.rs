//! Rendering options and configuration.

/// Options for rendering a document as LaTeX.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit the default preamble before the document body
    pub include_preamble: bool,

    /// Vertical space after each text block
    pub block_space: String,

    /// Vertical space after each page
    pub page_space: String,

    /// Float placement for figures (e.g. "h", "htbp")
    pub figure_placement: String,

    /// Length command used as the figure width, without the backslash
    pub figure_width: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the preamble.
    pub fn with_preamble(mut self, include: bool) -> Self {
        self.include_preamble = include;
        self
    }

    /// Render the body only.
    pub fn without_preamble(self) -> Self {
        self.with_preamble(false)
    }

    /// Set the space after text blocks.
    pub fn with_block_space(mut self, space: impl Into<String>) -> Self {
        self.block_space = space.into();
        self
    }

    /// Set the space after pages.
    pub fn with_page_space(mut self, space: impl Into<String>) -> Self {
        self.page_space = space.into();
        self
    }

    /// Set the figure float placement.
    pub fn with_figure_placement(mut self, placement: impl Into<String>) -> Self {
        self.figure_placement = placement.into();
        self
    }

    /// Set the figure width length command, e.g. `linewidth`.
    pub fn with_figure_width(mut self, width: impl Into<String>) -> Self {
        self.figure_width = width.into();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_preamble: true,
            block_space: "10pt".to_string(),
            page_space: "10pt".to_string(),
            figure_placement: "h".to_string(),
            figure_width: "textwidth".to_string(),
        }
    }
}
