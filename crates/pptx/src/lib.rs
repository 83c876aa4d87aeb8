//! PPTX (Office Open XML) backend for deck generation.
//!
//! Opens .pptx/.potx templates, which are ZIP archives of XML parts, renders
//! slide records into new slides built from the template's layouts, and reads
//! generated decks back for inspection.

mod package;
mod slide;
mod xml;

pub mod placeholder;
pub mod reader;
pub mod renderer;
pub mod template;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use placeholder::{BodyRule, PlaceholderInfo};
pub use reader::{DeckReader, DeckSummary, ShapeText, SlideSummary};
pub use renderer::DeckRenderer;
pub use template::{SlideLayout, TemplateDocument};

/// MIME type of a .pptx file.
pub const PPTX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
