//! Core slide types, fallback text splitting and best-effort extraction
//! of slide structure from language-model output.

pub mod error;
pub mod extract;
pub mod fallback;
pub mod structure;
pub mod types;

pub use error::{Error, Result};
pub use extract::{extract_json_array, parse_slide_records};
pub use fallback::FallbackSplitter;
pub use structure::{plan_slides, PlanSource, SlidePlan, SlideStructurer};
pub use types::{SlideContent, SlideRecord, DEFAULT_SLIDE_TITLE};
