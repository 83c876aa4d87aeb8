//! Deterministic paragraph-based slide structuring.
//!
//! Used when the model is unavailable or its output is unusable. Each
//! blank-line separated paragraph becomes one slide: the first line is the
//! title and the remaining lines are bullets.

use crate::SlideRecord;
use regex::Regex;
use std::sync::LazyLock;

/// One or more blank (empty or whitespace-only) lines.
static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)*\n").unwrap());

/// Splits raw text into slides without calling any external service.
#[derive(Debug, Clone, Default)]
pub struct FallbackSplitter;

impl FallbackSplitter {
    /// Create a new splitter.
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into one slide per paragraph.
    ///
    /// Returns an empty list only when the text is blank.
    pub fn split(&self, text: &str) -> Vec<SlideRecord> {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        PARAGRAPH_BREAK_REGEX
            .split(text)
            .enumerate()
            .map(|(i, paragraph)| {
                let mut lines = paragraph.lines();
                let first = lines.next().unwrap_or_default();
                let mut content: Vec<String> = lines.map(str::to_string).collect();
                if content.is_empty() {
                    content.push(String::new());
                }
                SlideRecord::new(format!("Slide {}: {}", i + 1, first), content)
            })
            .collect()
    }
}
