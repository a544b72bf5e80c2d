use serde::{Deserialize, Serialize};

/// A typed piece of a formatted solution, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Plain prose, possibly empty or whitespace
    #[serde(rename = "text")]
    Text { content: String },
    /// A single LaTeX expression without delimiters
    #[serde(rename = "inline")]
    InlineMath { content: String },
    /// Rows of LaTeX meant for an aligned-equations environment
    #[serde(rename = "align")]
    AlignBlock { content: String },
}

impl ContentBlock {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn inline_math(content: impl Into<String>) -> Self {
        Self::InlineMath {
            content: content.into(),
        }
    }

    pub fn align(content: impl Into<String>) -> Self {
        Self::AlignBlock {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Text { content } | Self::InlineMath { content } | Self::AlignBlock { content } => {
                content
            }
        }
    }
}

/// Why a solution could not be formatted, along with the text that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub message: String,
    pub original_content: String,
}

/// Output of a parse. When `error` is set, `blocks` holds a single text block
/// with the raw input so there is always something to render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseError>,
}

impl ParsedResult {
    pub fn parsed(blocks: Vec<ContentBlock>) -> Self {
        Self {
            blocks,
            error: None,
        }
    }

    /// Fallback result wrapping the raw input in one text block.
    pub fn fallback(original: impl Into<String>, message: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            blocks: vec![ContentBlock::text(original.clone())],
            error: Some(ParseError {
                message: message.into(),
                original_content: original,
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_with_type_tags() {
        let result = ParsedResult::parsed(vec![
            ContentBlock::text("Solution:"),
            ContentBlock::inline_math("x = 4"),
            ContentBlock::align("x &= 4\\\\[0.5em]"),
        ]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "blocks": [
                    {"type": "text", "content": "Solution:"},
                    {"type": "inline", "content": "x = 4"},
                    {"type": "align", "content": "x &= 4\\\\[0.5em]"},
                ]
            })
        );
    }

    #[test]
    fn fallback_keeps_original() {
        let result = ParsedResult::fallback("STEPS:\n???", "boom");
        assert!(!result.is_ok());
        assert_eq!(result.blocks, vec![ContentBlock::text("STEPS:\n???")]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"]["originalContent"], "STEPS:\n???");
        assert_eq!(json["error"]["message"], "boom");
    }
}
