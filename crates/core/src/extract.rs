//! Best-effort extraction of slide structure from free-form model output.
//!
//! Models are asked for a bare JSON array but routinely wrap it in prose or
//! code fences. Extraction takes everything from the first `[` to the last
//! `]` and parses that; anything else is reported as an error for the caller
//! to recover from.

use crate::{Error, Result, SlideRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Greedy match from the first opening bracket to the last closing one.
static JSON_ARRAY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Find the first bracketed, array-shaped substring in `raw`.
pub fn extract_json_array(raw: &str) -> Option<&str> {
    JSON_ARRAY_REGEX.find(raw).map(|m| m.as_str())
}

/// Parse slide records out of raw model output.
///
/// Fails with [`Error::NoJsonArray`] when nothing array-shaped is present,
/// [`Error::InvalidJson`] when the bracketed text does not parse as a list of
/// slide objects, and [`Error::EmptyDeck`] when the list is empty.
pub fn parse_slide_records(raw: &str) -> Result<Vec<SlideRecord>> {
    let json = extract_json_array(raw).ok_or(Error::NoJsonArray)?;

    let slides: Vec<SlideRecord> =
        serde_json::from_str(json).map_err(|e| Error::InvalidJson(e.to_string()))?;

    if slides.is_empty() {
        return Err(Error::EmptyDeck);
    }

    Ok(slides)
}
