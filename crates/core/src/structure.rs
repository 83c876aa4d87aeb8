//! Turning raw text into a slide plan: model first, paragraphs as fallback.

use crate::{FallbackSplitter, SlideRecord};

/// Something that can propose slide structure for a block of text.
///
/// Implementations absorb their own failures: `None` means "no structure
/// produced" and is a normal outcome that callers recover from.
pub trait SlideStructurer {
    /// Propose slides for `text`, steered by free-form `guidance`.
    fn structure(&self, text: &str, guidance: &str) -> Option<Vec<SlideRecord>>;
}

/// Where a plan's slides came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// Proposed by a [`SlideStructurer`].
    Model,
    /// Produced by the [`FallbackSplitter`].
    Fallback,
}

/// An ordered list of slides ready to render.
#[derive(Debug, Clone)]
pub struct SlidePlan {
    /// Slides in deck order.
    pub slides: Vec<SlideRecord>,

    /// Which path produced them.
    pub source: PlanSource,
}

impl SlidePlan {
    /// True when neither path produced anything to render.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Structure `text` with `structurer`, falling back to paragraph splitting.
///
/// The structurer is skipped when absent or when the text is blank. An empty
/// plan is only possible for blank text.
pub fn plan_slides(
    structurer: Option<&dyn SlideStructurer>,
    text: &str,
    guidance: &str,
) -> SlidePlan {
    if let Some(structurer) = structurer.filter(|_| !text.trim().is_empty()) {
        match structurer.structure(text, guidance) {
            Some(slides) if !slides.is_empty() => {
                log::info!("Model proposed {} slides", slides.len());
                return SlidePlan {
                    slides,
                    source: PlanSource::Model,
                };
            }
            _ => log::warn!("No structure from model, falling back to paragraph splitting"),
        }
    }

    let slides = FallbackSplitter::new().split(text);
    log::debug!("Fallback splitter produced {} slides", slides.len());

    SlidePlan {
        slides,
        source: PlanSource::Fallback,
    }
}
