//! Flattening node trees into lines and writing `.tex` files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

use super::node::{Command, Node};

/// Form feed, emitted by OCR engines at page breaks.
pub const FORM_FEED: char = '\u{c}';

/// `\vspace{amount}`.
pub fn vspace(amount: &str) -> Command {
    Command::new("vspace").arg(amount)
}

/// Flatten `nodes` into output lines.
///
/// Environments expand in place to begin, body, end. Once the whole tree is
/// flat, every form feed in every line is replaced by `\vspace{10pt}`.
pub fn flatten(nodes: &[Node]) -> Vec<String> {
    let mut lines = Vec::with_capacity(nodes.iter().map(Node::line_count).sum());
    for node in nodes {
        node.push_lines(&mut lines);
    }

    let page_break = vspace("10pt");
    lines
        .into_iter()
        .map(|line| {
            if line.contains(FORM_FEED) {
                line.replace(FORM_FEED, page_break.as_str())
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Default preamble for an A4 article with graphics support.
pub fn default_preamble() -> Vec<Node> {
    vec![
        Command::new("documentclass")
            .arg("article")
            .option("", "a4paper")
            .option("", "12pt")
            .into(),
        Command::new("usepackage").arg("amsmath").into(),
        Command::new("usepackage").arg("amssymb").into(),
        Command::new("usepackage").arg("graphicx").into(),
        Command::new("usepackage")
            .arg("geometry")
            .option("margin", "1in")
            .into(),
        Command::new("setlength")
            .arg(Command::new("parindent"))
            .arg("0pt")
            .into(),
    ]
}

/// A complete LaTeX file: preamble followed by body.
#[derive(Debug, Clone, Default)]
pub struct TexFile {
    preamble: Vec<Node>,
    body: Vec<Node>,
}

impl TexFile {
    /// Create a file with the default preamble.
    pub fn new(body: Vec<Node>) -> Self {
        Self {
            preamble: default_preamble(),
            body,
        }
    }

    /// Create a file with no preamble.
    pub fn without_preamble(body: Vec<Node>) -> Self {
        Self {
            preamble: Vec::new(),
            body,
        }
    }

    /// Append a node to the preamble.
    pub fn add_to_preamble(&mut self, node: impl Into<Node>) {
        self.preamble.push(node.into());
    }

    /// Preamble nodes.
    pub fn preamble(&self) -> &[Node] {
        &self.preamble
    }

    /// Body nodes.
    pub fn body(&self) -> &[Node] {
        &self.body
    }

    /// All lines of the file in order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = flatten(&self.preamble);
        lines.extend(flatten(&self.body));
        lines
    }

    /// The file content as one string.
    pub fn render(&self) -> String {
        let lines = self.lines();
        let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 2).sum());
        for line in &lines {
            out.push('\n');
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Write the file to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        for line in self.lines() {
            writer.write_all(b"\n")?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the file to `path`, replacing any existing content.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.write_to(File::create(path)?)?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}
