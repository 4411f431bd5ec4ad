use crate::error::{Result, SlideforgeError};
use crate::package::relationships::relationship_types;
use crate::pml::{PmlDocument, SlideRef};
use crate::synth::analyzer::TemplateMetadata;
use crate::synth::binder::ContentBinder;
use crate::synth::cloner::SlideCloner;
use crate::synth::layout_selector::{select_layout, SlideIntent};
use crate::synth::plan::ContentPlan;
use crate::synth::report::{Diagnostic, DiagnosticKind, SynthesisReport};
use crate::synth::settings::{CloneFailurePolicy, SelectionPolicy, SynthesisSettings};
use chrono::Utc;

/// Bytes of the generated presentation together with what happened on the way.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub bytes: Vec<u8>,
    pub report: SynthesisReport,
}

/// Turns a template and a content plan into a new presentation.
pub struct PresentationAssembler<'a> {
    settings: &'a SynthesisSettings,
}

impl<'a> PresentationAssembler<'a> {
    pub fn new(settings: &'a SynthesisSettings) -> Self {
        Self { settings }
    }

    /// Generate one slide per plan record, then drop every template slide.
    ///
    /// `metadata` must describe the same `template_bytes`. Fails with
    /// [`SlideforgeError::EmptyPlan`], [`SlideforgeError::EmptyTemplate`] or
    /// [`SlideforgeError::InvalidPackage`] before anything is generated, and
    /// with [`SlideforgeError::CloneFailed`] under the abort policy.
    pub fn synthesize(
        &self,
        template_bytes: &[u8],
        plan: &ContentPlan,
        metadata: &TemplateMetadata,
    ) -> Result<SynthesisOutput> {
        let _span = tracing::info_span!("synthesize", records = plan.slides.len()).entered();

        if plan.slides.is_empty() {
            return Err(SlideforgeError::EmptyPlan);
        }
        let mut doc = PmlDocument::from_bytes(template_bytes)?;
        let template_slides = doc.slides()?;
        if template_slides.is_empty() {
            return Err(SlideforgeError::EmptyTemplate);
        }
        tracing::info!(
            template_slides = template_slides.len(),
            policy = ?self.settings.selection_policy,
            "opened template"
        );

        let plan = plan.sanitized();
        let images = Some(&metadata.images.categorized).filter(|images| !images.is_empty());
        let mut binder = ContentBinder::new(self.settings);
        let mut report = SynthesisReport::new();

        for (index, content) in plan.slides.iter().enumerate() {
            let (slide, source) =
                self.generate_slide(&mut doc, &template_slides, metadata, index, &mut report)?;
            let diagnostics = binder.bind(&mut doc, &slide, index, content, images);
            report.diagnostics.extend(diagnostics);
            report.source_slides.push(source);
        }

        for slide in &template_slides {
            doc.remove_slide(slide)?;
        }
        report.template_slides_removed = template_slides.len();
        detach_removed_slide_links(&mut doc);
        report.parts_pruned = doc.package_mut().prune_unreachable_parts();

        doc.update_app_properties()?;
        let modified = self.settings.modified_at.unwrap_or_else(Utc::now);
        doc.package_mut()
            .stamp_core_properties(self.settings.modified_by.as_deref(), modified)?;

        report.slides_generated = doc.slide_count()?;
        let bytes = doc.to_bytes()?;
        tracing::info!(
            slides = report.slides_generated,
            removed = report.template_slides_removed,
            pruned = report.parts_pruned.len(),
            diagnostics = report.diagnostics.len(),
            "synthesized presentation"
        );
        Ok(SynthesisOutput { bytes, report })
    }

    /// Create the slide for plan record `index` and name the template slide
    /// it was cloned from, if any.
    fn generate_slide(
        &self,
        doc: &mut PmlDocument,
        template_slides: &[SlideRef],
        metadata: &TemplateMetadata,
        index: usize,
        report: &mut SynthesisReport,
    ) -> Result<(SlideRef, Option<usize>)> {
        match self.settings.selection_policy {
            SelectionPolicy::TemplateModulo => {
                let source = &template_slides[index % template_slides.len()];
                match SlideCloner::clone_slide(doc, source) {
                    Ok(slide) => Ok((slide, Some(source.index))),
                    Err(e) if self.settings.clone_failure_policy == CloneFailurePolicy::Degrade => {
                        tracing::warn!(slide = index, error = %e, "clone failed, using layout defaults");
                        report.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::CloneFailed,
                            Some(index),
                            "clone",
                            e.to_string(),
                        ));
                        let layout = match doc.slide_layout_part(&source.part_name) {
                            Some(layout) => layout,
                            None => first_layout(doc, metadata)?,
                        };
                        Ok((doc.add_slide(&layout)?, None))
                    }
                    Err(e) => Err(e),
                }
            }
            SelectionPolicy::LayoutIntent => {
                let intent = if index == 0 {
                    SlideIntent::TitleSlide
                } else {
                    SlideIntent::ContentSlide
                };
                let layout = match metadata.layouts.get(select_layout(&metadata.layouts, intent)) {
                    Some(layout) => layout.part_name.clone(),
                    None => first_layout(doc, metadata)?,
                };
                tracing::debug!(slide = index, ?intent, layout = %layout, "selected layout");
                Ok((doc.add_slide(&layout)?, None))
            }
        }
    }
}

fn first_layout(doc: &PmlDocument, metadata: &TemplateMetadata) -> Result<String> {
    if let Some(layout) = metadata.layouts.first() {
        return Ok(layout.part_name.clone());
    }
    doc.layouts()?
        .into_iter()
        .next()
        .map(|layout| layout.part_name)
        .ok_or_else(|| SlideforgeError::invalid_package("template has no slide layouts"))
}

/// Drop slide relationships that still point at deleted slides, from any part.
fn detach_removed_slide_links(doc: &mut PmlDocument) {
    let sources: Vec<String> = doc.package().part_names().cloned().collect();
    for source in sources {
        let stale: Vec<String> = doc
            .package()
            .dangling_relationships(&source)
            .into_iter()
            .filter(|rel| rel.rel_type == relationship_types::SLIDE)
            .map(|rel| rel.id.clone())
            .collect();
        for id in stale {
            tracing::debug!(part = %source, rel_id = %id, "detaching link to removed slide");
            doc.package_mut().remove_relationship(&source, &id);
        }
    }
}

/// Synthesize with default settings and return only the package bytes.
pub fn synthesize(
    template_bytes: &[u8],
    plan: &ContentPlan,
    metadata: &TemplateMetadata,
) -> Result<Vec<u8>> {
    let settings = SynthesisSettings::default();
    PresentationAssembler::new(&settings)
        .synthesize(template_bytes, plan, metadata)
        .map(|output| output.bytes)
}
