//! JSON layout dump of reconstructed documents.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetPolicy, AssetStore, BBox, Block, Page};

    fn document() -> (tempfile::TempDir, Document) {
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::create(tmp.path().join("j"), AssetPolicy::Exclusive).unwrap();
        let mut doc = Document::new("j", store);
        let mut page = Page::new(1, 50, 80);
        page.add_block(Block::text(BBox::new(0, 5, 50, 12), "Hello "));
        doc.add_page(page);
        (tmp, doc)
    }

    #[test]
    fn test_to_json_pretty() {
        let (_tmp, doc) = document();
        let json = to_json(&doc, JsonFormat::Pretty).unwrap();

        assert!(json.contains("\"type\": \"text\""));
        assert!(json.contains("Hello "));
        assert!(json.contains("\"figure_count\": 0"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let (_tmp, doc) = document();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pages"][0]["blocks"][0]["bbox"]["y"], 5);
    }
}
