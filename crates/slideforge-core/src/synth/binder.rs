use crate::error::{Result, SlideforgeError};
use crate::hash::content_key;
use crate::package::relationships::relationship_types;
use crate::pml::notes::set_notes_text;
use crate::pml::shapes::{next_shape_id, placeholder_role, shape_nodes, sp_tree};
use crate::pml::text::{
    append_paragraph, clear_paragraphs, ensure_tx_body, paragraphs, set_paragraph_text,
    set_shape_text, ParagraphStyle,
};
use crate::pml::{Geometry, PlaceholderRole, PmlDocument, SlideRef};
use crate::synth::images::{CategorizedImages, ImageAsset};
use crate::synth::plan::SlideContent;
use crate::synth::report::{Diagnostic, DiagnosticKind};
use crate::synth::settings::SynthesisSettings;
use crate::xml::namespaces::{A, P, R};
use crate::xml::{XAttribute, XName, XmlDocument, XmlFragment, XmlNodeData};
use indextree::NodeId;
use std::collections::HashMap;

/// Where a reinjected image goes in the z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stacking {
    Top,
    Bottom,
}

/// Writes planned content into generated slides.
///
/// One binder serves one synthesis: media parts written for reinjected images
/// are remembered by content so every slide shares the same part.
pub struct ContentBinder<'a> {
    settings: &'a SynthesisSettings,
    media: HashMap<String, String>,
}

impl<'a> ContentBinder<'a> {
    pub fn new(settings: &'a SynthesisSettings) -> Self {
        Self {
            settings,
            media: HashMap::new(),
        }
    }

    /// Bind `content` (and optionally template images) onto `slide`.
    ///
    /// Every field is bound on its own; a failure is logged, returned as a
    /// diagnostic, and does not stop the other fields.
    pub fn bind(
        &mut self,
        doc: &mut PmlDocument,
        slide: &SlideRef,
        slide_index: usize,
        content: &SlideContent,
        images: Option<&CategorizedImages>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut fail = |field: &str, error: SlideforgeError| {
            tracing::warn!(slide = slide_index, field, error = %error, "binding failed");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::BindingFieldFailed,
                Some(slide_index),
                field,
                error.to_string(),
            ));
        };

        match doc.package().get_xml_part(&slide.part_name) {
            Ok(mut slide_doc) => {
                if !content.title.is_empty() && !bind_title(&mut slide_doc, &content.title) {
                    tracing::debug!(slide = slide_index, "no title placeholder");
                }
                if !content.bullets.is_empty() && !bind_bullets(&mut slide_doc, &content.bullets) {
                    tracing::debug!(slide = slide_index, "no body placeholder");
                }
                if let Some(images) = images.filter(|_| self.settings.reinject_images) {
                    for (asset, stacking) in self.images_to_place(images) {
                        if let Err(e) = self.place_image(doc, slide, &mut slide_doc, asset, stacking) {
                            fail("image", e);
                        }
                    }
                }
                if let Err(e) = doc.package_mut().put_xml_part(&slide.part_name, &slide_doc) {
                    fail("slide", e);
                }
            }
            Err(e) => fail("slide", e),
        }

        if let Some(notes) = content.notes.as_deref().filter(|n| !n.is_empty()) {
            if let Err(e) = set_notes_text(doc, &slide.part_name, notes) {
                fail("notes", e);
            }
        }

        tracing::debug!(slide = slide_index, part = %slide.part_name, "bound content");
        diagnostics
    }

    /// Up to `max_logos_per_slide` logos; the first background only when no
    /// logo was chosen.
    fn images_to_place<'i>(&self, images: &'i CategorizedImages) -> Vec<(&'i ImageAsset, Stacking)> {
        let logos: Vec<_> = images
            .logos
            .iter()
            .take(self.settings.max_logos_per_slide)
            .map(|asset| (asset, Stacking::Top))
            .collect();
        if !logos.is_empty() {
            return logos;
        }
        images
            .backgrounds
            .first()
            .map(|asset| vec![(asset, Stacking::Bottom)])
            .unwrap_or_default()
    }

    fn place_image(
        &mut self,
        doc: &mut PmlDocument,
        slide: &SlideRef,
        slide_doc: &mut XmlDocument,
        asset: &ImageAsset,
        stacking: Stacking,
    ) -> Result<()> {
        let tree = sp_tree(slide_doc)
            .ok_or_else(|| SlideforgeError::invalid_package("slide has no shape tree"))?;
        let media_part = self.media_part(doc, asset)?;
        let rel_id =
            doc.package_mut()
                .add_relationship(&slide.part_name, relationship_types::IMAGE, &media_part);

        let id = next_shape_id(slide_doc);
        let picture = picture_fragment(id, &format!("Picture {}", id), &rel_id, &asset.geometry);
        match stacking {
            Stacking::Bottom => match shape_nodes(slide_doc, tree).first() {
                Some(&first) => slide_doc.insert_fragment_before(first, &picture),
                None => append_shape(slide_doc, tree, &picture),
            },
            Stacking::Top => append_shape(slide_doc, tree, &picture),
        };
        Ok(())
    }

    /// Part holding the asset's bytes, written at most once per synthesis.
    fn media_part(&mut self, doc: &mut PmlDocument, asset: &ImageAsset) -> Result<String> {
        if let Some(part) = self.media.get(&asset.content_key) {
            return Ok(part.clone());
        }

        // The template's own media part is still in the package and identical.
        let existing = doc
            .package()
            .get_part(&asset.part_name)
            .filter(|bytes| content_key(bytes) == asset.content_key)
            .map(|_| asset.part_name.clone());

        let part = match existing {
            Some(part) => part,
            None if !asset.bytes.is_empty() => {
                let extension = asset.extension();
                let part = doc.package().next_part_name("ppt/media/image", &extension);
                doc.package_mut().set_part(&part, asset.bytes.to_vec());
                doc.package_mut()
                    .ensure_default_content_type(&extension, &asset.content_type);
                part
            }
            None => {
                return Err(SlideforgeError::missing_part(&asset.part_name));
            }
        };
        self.media.insert(asset.content_key.clone(), part.clone());
        Ok(part)
    }
}

fn first_with_role(doc: &XmlDocument, test: fn(PlaceholderRole) -> bool) -> Option<NodeId> {
    let tree = sp_tree(doc)?;
    shape_nodes(doc, tree)
        .into_iter()
        .find(|&shape| test(placeholder_role(doc, shape)))
}

/// Overwrite the title placeholder's text, keeping the first paragraph's
/// formatting. Returns `false` when the slide has no title placeholder.
fn bind_title(doc: &mut XmlDocument, title: &str) -> bool {
    let Some(shape) = first_with_role(doc, PlaceholderRole::is_title) else {
        return false;
    };
    let body = ensure_tx_body(doc, shape);
    let existing = paragraphs(doc, body);
    match existing.split_first() {
        Some((&first, rest)) if !title.contains('\n') => {
            set_paragraph_text(doc, first, title);
            for &paragraph in rest {
                doc.remove(paragraph);
            }
        }
        _ => set_shape_text(doc, shape, title),
    }
    true
}

/// Replace the body placeholder's content with one level-0 paragraph per
/// bullet. Returns `false` when the slide has no body placeholder.
fn bind_bullets(doc: &mut XmlDocument, bullets: &[String]) -> bool {
    let Some(shape) = first_with_role(doc, PlaceholderRole::is_body) else {
        return false;
    };
    let body = ensure_tx_body(doc, shape);
    let style = paragraphs(doc, body)
        .first()
        .map(|&p| ParagraphStyle::capture(doc, p).at_level_zero())
        .unwrap_or_default();
    clear_paragraphs(doc, body);
    for bullet in bullets {
        append_paragraph(doc, body, bullet, &style);
    }
    true
}

fn append_shape(doc: &mut XmlDocument, tree: NodeId, shape: &XmlFragment) -> NodeId {
    match doc.find_child(tree, &P::extLst()) {
        Some(ext) => doc.insert_fragment_before(ext, shape),
        None => doc.append_fragment(tree, shape),
    }
}

fn el(name: XName, attrs: &[(&str, &str)]) -> XmlFragment {
    XmlFragment::new(XmlNodeData::element_with_attrs(
        name,
        attrs
            .iter()
            .map(|(n, v)| XAttribute::new(XName::local(n), v))
            .collect(),
    ))
}

/// A `p:pic` showing the image behind `rel_id` at `geometry`.
fn picture_fragment(id: u32, name: &str, rel_id: &str, geometry: &Geometry) -> XmlFragment {
    let id = id.to_string();
    let (x, y) = (geometry.left.to_string(), geometry.top.to_string());
    let (cx, cy) = (geometry.width.to_string(), geometry.height.to_string());

    let blip = XmlFragment::new(XmlNodeData::element_with_attrs(
        A::blip(),
        vec![XAttribute::new(R::embed(), rel_id)],
    ));

    el(P::pic(), &[])
        .with_child(
            el(P::nvPicPr(), &[])
                .with_child(el(P::cNvPr(), &[("id", id.as_str()), ("name", name)]))
                .with_child(
                    el(P::cNvPicPr(), &[]).with_child(el(A::picLocks(), &[("noChangeAspect", "1")])),
                )
                .with_child(el(P::nvPr(), &[])),
        )
        .with_child(
            el(P::blipFill(), &[])
                .with_child(blip)
                .with_child(el(A::stretch(), &[]).with_child(el(A::fillRect(), &[]))),
        )
        .with_child(
            el(P::spPr(), &[])
                .with_child(
                    el(A::xfrm(), &[])
                        .with_child(el(A::off(), &[("x", x.as_str()), ("y", y.as_str())]))
                        .with_child(el(A::ext(), &[("cx", cx.as_str()), ("cy", cy.as_str())])),
                )
                .with_child(el(A::prstGeom(), &[("prst", "rect")]).with_child(el(A::avLst(), &[]))),
        )
}
