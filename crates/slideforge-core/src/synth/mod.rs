//! Template-driven slide synthesis: analyze a template, then clone its slides
//! and bind planned content onto the copies.

pub mod analyzer;
pub mod assembler;
pub mod binder;
pub mod cloner;
pub mod images;
pub mod layout_selector;
pub mod plan;
pub mod report;
pub mod settings;

pub use analyzer::{LayoutInfo, TemplateAnalyzer, TemplateMetadata};
pub use assembler::{synthesize, PresentationAssembler, SynthesisOutput};
pub use binder::ContentBinder;
pub use cloner::SlideCloner;
pub use images::{classify, classify_geometry, extract_images, CategorizedImages, ImageAsset, ImageCategory};
pub use layout_selector::{select_layout, SlideIntent};
pub use plan::{ContentPlan, PlanMeta, SlideContent};
pub use report::{Diagnostic, DiagnosticKind, SynthesisReport};
pub use settings::{ClassifierSettings, CloneFailurePolicy, SelectionPolicy, SynthesisSettings};
