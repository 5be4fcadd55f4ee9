//! Shared response types

use serde::{Deserialize, Serialize};

/// A citation the assistant used, taken from a resource item of an action output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredLink {
    pub uri: String,
    pub text: String,
}

impl StructuredLink {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            text: text.into(),
        }
    }

    /// Text shown for the link: its display text, or the URI when that is empty
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            &self.uri
        } else {
            &self.text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_falls_back_to_uri() {
        let link = StructuredLink::new("https://example.com/a", "");
        assert_eq!(link.display_text(), "https://example.com/a");

        let link = StructuredLink::new("https://example.com/a", "Example");
        assert_eq!(link.display_text(), "Example");
    }

    #[test]
    fn test_link_serializes_as_uri_and_text() {
        let link = StructuredLink::new("https://x/y", "Doc");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"uri": "https://x/y", "text": "Doc"})
        );
    }
}
