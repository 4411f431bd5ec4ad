use crate::pml::Emu;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Thresholds for sorting template images into logo, background and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Reference slide width; classification ignores the template's own size.
    pub slide_width: Emu,
    pub slide_height: Emu,
    /// Logos cover less than this share of the slide.
    pub logo_max_area_ratio: f64,
    /// Logos start above this share of the slide height.
    pub logo_max_top_ratio: f64,
    /// Logos hug the left or right edge within this share of the slide width.
    pub logo_edge_ratio: f64,
    /// Backgrounds cover more than this share of the slide.
    pub background_min_area_ratio: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            slide_width: 9_144_000,
            slide_height: 6_858_000,
            logo_max_area_ratio: 0.15,
            logo_max_top_ratio: 0.2,
            logo_edge_ratio: 0.2,
            background_min_area_ratio: 0.7,
        }
    }
}

/// How the source of each generated slide is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Record `i` clones template slide `i mod N`.
    #[default]
    TemplateModulo,
    /// Record 0 gets a title layout, the rest a title-and-body layout.
    LayoutIntent,
}

/// What happens when a template slide cannot be cloned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneFailurePolicy {
    /// Fail the whole synthesis.
    #[default]
    Abort,
    /// Keep a layout-default slide, bind content into it, record a diagnostic.
    Degrade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    pub classifier: ClassifierSettings,
    pub max_logos_per_slide: usize,
    pub selection_policy: SelectionPolicy,
    pub clone_failure_policy: CloneFailurePolicy,
    /// Place classified template images on generated slides.
    pub reinject_images: bool,
    pub max_theme_colors: usize,
    pub max_theme_fonts: usize,
    /// Written to `cp:lastModifiedBy` when set.
    pub modified_by: Option<String>,
    /// Written to `dcterms:modified`; the current time when unset.
    pub modified_at: Option<DateTime<Utc>>,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            classifier: ClassifierSettings::default(),
            max_logos_per_slide: 2,
            selection_policy: SelectionPolicy::default(),
            clone_failure_policy: CloneFailurePolicy::default(),
            reinject_images: true,
            max_theme_colors: 10,
            max_theme_fonts: 5,
            modified_by: None,
            modified_at: None,
        }
    }
}

impl SynthesisSettings {
    pub fn new() -> Self {
        Self::default()
    }
}
