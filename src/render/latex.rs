//! LaTeX rendering for reconstructed documents.

use std::path::Path;

use crate::error::Result;
use crate::latex::{vspace, Command, CommandOption, Environment, Node, TexFile, Text};
use crate::model::{Block, BlockContent, Document, Page};

use super::RenderOptions;

/// Convert a document to LaTeX nodes.
///
/// The result is `\graphicspath{<asset dir>}` followed by a single
/// `document` environment holding every page in order.
pub fn to_latex_nodes(doc: &Document, options: &RenderOptions) -> Vec<Node> {
    let mut body = Vec::new();
    for page in &doc.pages {
        body.extend(page_nodes(page, options));
    }

    let graphics_path = Command::new("graphicspath").arg(tex_path(doc.asset_dir()));
    vec![
        graphics_path.into(),
        Environment::new("document", body).into(),
    ]
}

/// Nodes for one page: its blocks, then `\par` and the page space.
pub fn page_nodes(page: &Page, options: &RenderOptions) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(page.blocks.len() * 2 + 2);
    for block in &page.blocks {
        nodes.extend(block_nodes(block, options));
    }
    nodes.push(Command::new("par").into());
    nodes.push(vspace(&options.page_space).into());
    nodes
}

/// Nodes for one block.
///
/// Text becomes escaped text followed by the block space. A figure becomes a
/// `figure` environment with the image at full width, centered.
pub fn block_nodes(block: &Block, options: &RenderOptions) -> Vec<Node> {
    match &block.content {
        BlockContent::Text { text } => vec![
            Text::new(text).into(),
            vspace(&options.block_space).into(),
        ],
        BlockContent::Figure { asset } => {
            let include = Command::new("includegraphics")
                .arg(tex_path(&asset.path))
                .option("width", Command::new(options.figure_width.as_str()));
            let figure = Environment::with_options(
                "figure",
                vec![include.into(), Command::new("centering").into()],
                vec![CommandOption::bare(options.figure_placement.as_str())],
            );
            vec![figure.into()]
        }
    }
}

/// Wrap the document in a [`TexFile`], with or without the preamble.
pub fn to_tex_file(doc: &Document, options: &RenderOptions) -> TexFile {
    let body = to_latex_nodes(doc, options);
    if options.include_preamble {
        TexFile::new(body)
    } else {
        TexFile::without_preamble(body)
    }
}

/// Flattened output lines of the document.
pub fn to_tex_lines(doc: &Document, options: &RenderOptions) -> Vec<String> {
    to_tex_file(doc, options).lines()
}

/// Convert a document to LaTeX source.
pub fn to_tex(doc: &Document, options: &RenderOptions) -> Result<String> {
    Ok(to_tex_file(doc, options).render())
}

/// Write the document as LaTeX to `path`, replacing the file if it exists.
pub fn write_tex<P: AsRef<Path>>(doc: &Document, path: P, options: &RenderOptions) -> Result<()> {
    to_tex_file(doc, options).save(path)
}

/// Path as written inside LaTeX source, always with forward slashes.
pub fn tex_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
