//! Domain types for representing the structure of a generated deck.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title used when a slide record carries none.
pub const DEFAULT_SLIDE_TITLE: &str = "Untitled Slide";

/// One slide worth of structure: a title and its bullet lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Slide title. `None` when the source omitted it.
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: Option<String>,

    /// Body content, in display order.
    #[serde(default)]
    pub content: SlideContent,
}

impl SlideRecord {
    /// Create a record with a title and bullet lines.
    pub fn new<I, S>(title: impl Into<String>, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: Some(title.into()),
            content: SlideContent::Bullets(bullets.into_iter().map(Into::into).collect()),
        }
    }

    /// The title to display, falling back to [`DEFAULT_SLIDE_TITLE`].
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_SLIDE_TITLE)
    }
}

/// Body content of a slide.
///
/// Model output normally carries a list of bullets, but a bare scalar is
/// accepted and rendered as a single paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SlideContent {
    /// One paragraph per entry.
    Bullets(Vec<String>),
    /// A single paragraph; empty text adds nothing.
    Text(String),
}

impl Default for SlideContent {
    fn default() -> Self {
        Self::Bullets(Vec::new())
    }
}

impl SlideContent {
    /// Paragraph texts to place in the body, in order.
    pub fn paragraphs(&self) -> Vec<&str> {
        match self {
            Self::Bullets(items) => items.iter().map(String::as_str).collect(),
            Self::Text(text) if text.is_empty() => Vec::new(),
            Self::Text(text) => vec![text.as_str()],
        }
    }
}

impl<'de> Deserialize<'de> for SlideContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Self::Bullets(items.into_iter().map(value_text).collect()),
            Value::Null => Self::default(),
            other => Self::Text(value_text(other)),
        })
    }
}

fn lenient_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(value_text(other)),
    })
}

/// Render a JSON value as display text: strings verbatim, anything else as JSON.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_bullets() {
        let record: SlideRecord =
            serde_json::from_str(r#"{"title": "Intro", "content": ["a", "b"]}"#).unwrap();
        assert_eq!(record, SlideRecord::new("Intro", ["a", "b"]));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let record: SlideRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.display_title(), DEFAULT_SLIDE_TITLE);
        assert!(record.content.paragraphs().is_empty());
    }

    #[test]
    fn test_deserialize_scalar_content() {
        let record: SlideRecord =
            serde_json::from_str(r#"{"title": "One", "content": "just text"}"#).unwrap();
        assert_eq!(record.content, SlideContent::Text("just text".into()));
        assert_eq!(record.content.paragraphs(), vec!["just text"]);
    }

    #[test]
    fn test_non_string_values_become_text() {
        let record: SlideRecord =
            serde_json::from_str(r#"{"title": 2024, "content": [1, true, "x"]}"#).unwrap();
        assert_eq!(record.display_title(), "2024");
        assert_eq!(record.content.paragraphs(), vec!["1", "true", "x"]);
    }

    #[test]
    fn test_empty_text_has_no_paragraphs() {
        assert!(SlideContent::Text(String::new()).paragraphs().is_empty());
        assert_eq!(SlideContent::Bullets(vec![String::new()]).paragraphs(), vec![""]);
    }
}
