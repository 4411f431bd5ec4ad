use crate::synth::analyzer::LayoutInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideIntent {
    TitleSlide,
    ContentSlide,
}

/// Pick the layout index that best fits `intent`.
///
/// A title slide wants a title without a body, a content slide wants both.
/// When nothing matches, title slides fall back to layout 0 and content
/// slides to layout 1 (layout 0 when there is only one). Never fails for a
/// non-empty catalogue; an empty one yields 0.
pub fn select_layout(layouts: &[LayoutInfo], intent: SlideIntent) -> usize {
    match intent {
        SlideIntent::TitleSlide => layouts
            .iter()
            .position(|l| l.has_title && !l.has_body)
            .unwrap_or(0),
        SlideIntent::ContentSlide => layouts
            .iter()
            .position(|l| l.has_title && l.has_body)
            .unwrap_or(if layouts.len() >= 2 { 1 } else { 0 }),
    }
}
