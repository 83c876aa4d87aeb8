//! Layout placeholders and the rules for picking the title and body
//! placeholder on a new slide.

/// Placeholder kinds that are never copied onto a new slide.
const UNCLONED_KINDS: &[&str] = &["dt", "ftr", "sldNum"];

/// Placeholder kinds that hold objects rather than free text.
const NON_TEXT_KINDS: &[&str] = &["pic", "chart", "tbl", "dgm", "media", "clipArt"];

/// A placeholder declared by a slide layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderInfo {
    /// Shape name, e.g. "Content Placeholder 2".
    pub name: String,

    /// The `type` attribute of `p:ph`; `obj` when absent.
    pub kind: String,

    /// The `idx` attribute of `p:ph`; 0 when absent.
    pub idx: u32,

    /// The `orient` attribute, if any.
    pub orient: Option<String>,

    /// The `sz` attribute, if any.
    pub size: Option<String>,
}

impl PlaceholderInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, idx: u32) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            idx,
            orient: None,
            size: None,
        }
    }

    /// Whether a new slide gets its own copy of this placeholder.
    pub fn is_cloneable(&self) -> bool {
        !UNCLONED_KINDS.contains(&self.kind.as_str())
    }

    /// Whether the placeholder can hold free text.
    pub fn supports_text(&self) -> bool {
        !NON_TEXT_KINDS.contains(&self.kind.as_str())
    }
}

/// Position of the title placeholder: the first one with idx 0.
pub fn title_position(placeholders: &[PlaceholderInfo]) -> Option<usize> {
    placeholders.iter().position(|ph| ph.idx == 0)
}

/// Rules for locating the body placeholder, tried in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRule {
    /// The placeholder conventionally indexed as the primary body (idx 1).
    PrimaryIndex,
    /// Named like a content or body region, and not idx 0.
    NamedContent,
    /// Any placeholder other than the title that takes free text.
    FreeText,
}

impl BodyRule {
    /// All rules, highest priority first.
    pub const RANKED: [BodyRule; 3] = [Self::PrimaryIndex, Self::NamedContent, Self::FreeText];

    fn matches(self, ph: &PlaceholderInfo, is_title: bool) -> bool {
        match self {
            Self::PrimaryIndex => ph.idx == 1,
            Self::NamedContent => {
                let name = ph.name.to_lowercase();
                (name.contains("content") || name.contains("body")) && ph.idx != 0
            }
            Self::FreeText => !is_title && ph.supports_text(),
        }
    }
}

/// Pick the body placeholder, returning its position and the rule that matched.
///
/// Candidates are tried in ascending idx order, document order breaking ties.
pub fn select_body(
    placeholders: &[PlaceholderInfo],
    title: Option<usize>,
) -> Option<(usize, BodyRule)> {
    let mut by_idx: Vec<usize> = (0..placeholders.len()).collect();
    by_idx.sort_by_key(|&i| placeholders[i].idx);

    BodyRule::RANKED.iter().find_map(|&rule| {
        by_idx
            .iter()
            .copied()
            .find(|&i| rule.matches(&placeholders[i], Some(i) == title))
            .map(|pos| (pos, rule))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(placeholders: &[PlaceholderInfo]) -> Option<(usize, BodyRule)> {
        select_body(placeholders, title_position(placeholders))
    }

    #[test]
    fn test_primary_index_wins() {
        let phs = vec![
            PlaceholderInfo::new("Title 1", "title", 0),
            PlaceholderInfo::new("Body Text", "body", 2),
            PlaceholderInfo::new("Content Placeholder 2", "obj", 1),
        ];
        assert_eq!(select(&phs), Some((2, BodyRule::PrimaryIndex)));
    }

    #[test]
    fn test_name_heuristic() {
        let phs = vec![
            PlaceholderInfo::new("Title 1", "title", 0),
            PlaceholderInfo::new("Picture 3", "pic", 13),
            PlaceholderInfo::new("Text BODY 4", "body", 14),
        ];
        assert_eq!(select(&phs), Some((2, BodyRule::NamedContent)));
    }

    #[test]
    fn test_name_heuristic_skips_idx_zero() {
        let phs = vec![PlaceholderInfo::new("Content Title", "title", 0)];
        assert_eq!(select(&phs), None);
    }

    #[test]
    fn test_free_text_fallback() {
        let phs = vec![
            PlaceholderInfo::new("Title 1", "title", 0),
            PlaceholderInfo::new("Picture 2", "pic", 10),
            PlaceholderInfo::new("Subtitle 3", "subTitle", 11),
        ];
        assert_eq!(select(&phs), Some((2, BodyRule::FreeText)));
    }

    #[test]
    fn test_lower_idx_wins_regardless_of_document_order() {
        let phs = vec![
            PlaceholderInfo::new("Title 1", "title", 0),
            PlaceholderInfo::new("Body Right", "body", 14),
            PlaceholderInfo::new("Body Left", "body", 13),
        ];
        assert_eq!(select(&phs), Some((2, BodyRule::NamedContent)));

        let phs = vec![
            PlaceholderInfo::new("Title 1", "title", 0),
            PlaceholderInfo::new("Caption", "subTitle", 21),
            PlaceholderInfo::new("Quote", "subTitle", 20),
        ];
        assert_eq!(select(&phs), Some((2, BodyRule::FreeText)));
    }

    #[test]
    fn test_title_only_layout_has_no_body() {
        let phs = vec![PlaceholderInfo::new("Title 1", "title", 0)];
        assert_eq!(title_position(&phs), Some(0));
        assert_eq!(select(&phs), None);
        assert_eq!(select(&[]), None);
    }

    #[test]
    fn test_cloneable_and_text_kinds() {
        assert!(!PlaceholderInfo::new("Date 3", "dt", 10).is_cloneable());
        assert!(!PlaceholderInfo::new("Footer 4", "ftr", 11).is_cloneable());
        assert!(!PlaceholderInfo::new("Number 5", "sldNum", 12).is_cloneable());
        assert!(PlaceholderInfo::new("Title 1", "title", 0).is_cloneable());
        assert!(!PlaceholderInfo::new("Picture 2", "pic", 1).supports_text());
        assert!(PlaceholderInfo::new("Content 2", "obj", 1).supports_text());
    }
}
