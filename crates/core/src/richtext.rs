//! Structured rich-text documents for editorial post bodies.
//!
//! A body is an array of block nodes, stored as JSONB. Admin input
//! arrives either already structured or as plain text; plain text is
//! wrapped into paragraph nodes. Malformed structured input degrades
//! to the empty document; a bad paste must never fail the save.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One block-level node of a rich-text document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockNode {
    Paragraph {
        text: String,
    },
    Heading {
        level: u8,
        text: String,
    },
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

/// An ordered rich-text document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(pub Vec<BlockNode>);

impl Document {
    pub fn empty() -> Document {
        Document(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse admin input into a document.
    ///
    /// - A JSON array is deserialized as structured nodes; anything
    ///   that does not deserialize degrades to the empty document.
    /// - A JSON string is treated as plain text: blank-line-separated
    ///   chunks become paragraph nodes.
    /// - Null and any other shape degrade to the empty document.
    pub fn from_input(value: &Value) -> Document {
        match value {
            Value::Array(_) => {
                serde_json::from_value(value.clone()).unwrap_or_else(|_| Document::empty())
            }
            Value::String(text) => Document::from_plain_text(text),
            _ => Document::empty(),
        }
    }

    /// Wrap plain text into paragraph nodes, splitting on blank lines.
    pub fn from_plain_text(text: &str) -> Document {
        let nodes = text
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| BlockNode::Paragraph {
                text: chunk.to_string(),
            })
            .collect();
        Document(nodes)
    }

    /// The JSONB representation persisted in translation rows.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Array(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_wraps_into_paragraphs() {
        let doc = Document::from_input(&json!("Première ligne.\n\nSeconde ligne."));
        assert_eq!(
            doc.0,
            vec![
                BlockNode::Paragraph {
                    text: "Première ligne.".to_string()
                },
                BlockNode::Paragraph {
                    text: "Seconde ligne.".to_string()
                },
            ]
        );
    }

    #[test]
    fn structured_array_round_trips() {
        let input = json!([
            {"type": "heading", "level": 2, "text": "Atelier"},
            {"type": "paragraph", "text": "Notes from the studio."},
            {"type": "quote", "text": "Ligne pure.", "attribution": "A.D."}
        ]);
        let doc = Document::from_input(&input);
        assert_eq!(doc.0.len(), 3);
        assert_eq!(doc.to_value(), input);
    }

    #[test]
    fn malformed_array_degrades_to_empty() {
        let doc = Document::from_input(&json!([{"type": "hologram", "spin": 3}]));
        assert!(doc.is_empty());
    }

    #[test]
    fn null_and_objects_degrade_to_empty() {
        assert!(Document::from_input(&Value::Null).is_empty());
        assert!(Document::from_input(&json!({"text": "x"})).is_empty());
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        assert!(Document::from_plain_text("  \n\n   ").is_empty());
    }
}
