//! Rendering module for converting documents to output formats.

mod json;
mod latex;
mod options;
mod stats;

pub use json::{to_json, JsonFormat};
pub use latex::{
    block_nodes, page_nodes, tex_path, to_latex_nodes, to_tex, to_tex_file, to_tex_lines,
    write_tex,
};
pub use options::RenderOptions;
pub use stats::DocumentStats;
