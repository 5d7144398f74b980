//! Document model types for reconstructed page content.
//!
//! A [`Document`] owns its [`Page`]s, each page owns its [`Block`]s, and the
//! document's [`AssetStore`] owns the figure namespace shared by all pages.

mod asset;
mod bbox;
mod document;
mod page;

pub use asset::{asset_file_name, AssetPolicy, AssetRef, AssetStore};
pub use bbox::BBox;
pub use document::Document;
pub use page::{Block, BlockContent, BlockKind, Page};
