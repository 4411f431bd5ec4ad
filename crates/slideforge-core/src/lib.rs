pub mod error;
pub mod xml;
pub mod hash;
pub mod package;
pub mod util;
pub mod pml;
pub mod synth;

pub use error::{Result, SlideforgeError};

pub use pml::{PmlDocument, SlideRef};
pub use synth::{
    synthesize, ContentBinder, ContentPlan, PresentationAssembler, SlideCloner, SlideContent,
    SynthesisOutput, SynthesisReport, SynthesisSettings, TemplateAnalyzer, TemplateMetadata,
};
