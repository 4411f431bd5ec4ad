use crate::error::{Result, SlideforgeError};
use crate::util::{make_valid_xml, normalize_line_breaks};
use serde::{Deserialize, Serialize};

/// Smallest plan the pipeline accepts.
pub const MIN_PLAN_SLIDES: usize = 3;

/// Content of one generated slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    pub title: String,
    pub bullets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SlideContent {
    pub fn new(title: &str, bullets: &[&str], notes: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
            notes: notes.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanMeta {
    #[serde(alias = "estimatedDurationMinutes")]
    pub estimated_duration_minutes: f64,
    #[serde(alias = "slideCount")]
    pub slide_count: u32,
    pub tone: String,
}

/// A content plan as produced by the external planner.
///
/// Keys are accepted in snake_case or camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPlan {
    pub slides: Vec<SlideContent>,
    #[serde(default)]
    pub meta: PlanMeta,
}

impl ContentPlan {
    pub fn new(slides: Vec<SlideContent>) -> Self {
        let slide_count = slides.len() as u32;
        Self {
            slides,
            meta: PlanMeta {
                slide_count,
                ..PlanMeta::default()
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the plan before it reaches synthesis.
    pub fn validate(&self) -> Result<()> {
        if self.slides.len() < MIN_PLAN_SLIDES {
            return Err(invalid(format!(
                "plan must have at least {} slides, got {}",
                MIN_PLAN_SLIDES,
                self.slides.len()
            )));
        }
        for (index, slide) in self.slides.iter().enumerate() {
            if slide.title.trim().is_empty() {
                return Err(invalid(format!("slide {} has an empty title", index)));
            }
            if slide.bullets.is_empty() {
                return Err(invalid(format!("slide {} has no bullets", index)));
            }
        }
        if self.meta.slide_count as usize != self.slides.len() {
            tracing::debug!(
                declared = self.meta.slide_count,
                actual = self.slides.len(),
                "declared slide count differs from slide records"
            );
        }
        Ok(())
    }

    /// Copy with every string made safe to embed in XML.
    pub fn sanitized(&self) -> Self {
        let clean = |s: &str| make_valid_xml(&normalize_line_breaks(s));
        Self {
            slides: self
                .slides
                .iter()
                .map(|slide| SlideContent {
                    title: clean(slide.title.as_str()),
                    bullets: slide.bullets.iter().map(|b| clean(b.as_str())).collect(),
                    notes: slide.notes.as_deref().map(clean),
                })
                .collect(),
            meta: self.meta.clone(),
        }
    }
}

fn invalid(message: String) -> SlideforgeError {
    SlideforgeError::InvalidPlan { message }
}
