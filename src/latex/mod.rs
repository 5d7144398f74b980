//! LaTeX markup model: text, commands and environments.
//!
//! Nodes form a tree. [`flatten`] turns a tree into output lines and
//! [`TexFile`] writes them out.

mod escape;
mod node;
mod texfile;

pub use escape::{escape_special_chars, is_special, SPECIAL_CHARS};
pub use node::{Arg, Command, CommandOption, Environment, Node, Text};
pub use texfile::{default_preamble, flatten, vspace, TexFile, FORM_FEED};
