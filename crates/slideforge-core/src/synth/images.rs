//! Image extraction from template slides and the logo/background/content
//! classifier.

use crate::error::Result;
use crate::hash::content_key;
use crate::package::content_types::image_content_type;
use crate::package::parts::extension;
use crate::pml::shapes::{
    matching_placeholder, placeholder_element, shape_geometry, shape_kind, shape_nodes, sp_tree,
    ShapeKind,
};
use crate::pml::{Geometry, PmlDocument, SlideRef};
use crate::synth::report::{Diagnostic, DiagnosticKind};
use crate::synth::settings::ClassifierSettings;
use crate::xml::namespaces::{A, P, R};
use crate::xml::XmlDocument;
use image::ImageReader;
use indextree::NodeId;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    Logo,
    Background,
    Content,
}

/// An image found on a template slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    pub source_slide_index: usize,
    pub source_shape_index: usize,
    #[serde(skip, default = "no_bytes")]
    pub bytes: Arc<[u8]>,
    pub byte_len: usize,
    /// Digest-based identity used to share one media part between slides.
    pub content_key: String,
    pub part_name: String,
    pub content_type: String,
    pub geometry: Geometry,
    /// `(width, height)` in pixels when the blob could be decoded.
    pub pixel_dimensions: Option<(u32, u32)>,
}

impl ImageAsset {
    pub fn new(
        source_slide_index: usize,
        source_shape_index: usize,
        bytes: Arc<[u8]>,
        part_name: &str,
        content_type: &str,
        geometry: Geometry,
    ) -> Self {
        Self {
            source_slide_index,
            source_shape_index,
            byte_len: bytes.len(),
            content_key: content_key(&bytes),
            pixel_dimensions: pixel_dimensions(&bytes),
            bytes,
            part_name: part_name.to_string(),
            content_type: content_type.to_string(),
            geometry,
        }
    }

    /// File extension to use for a media part holding this image.
    pub fn extension(&self) -> String {
        crate::package::content_types::image_extension(&self.content_type)
            .map(str::to_string)
            .or_else(|| extension(&self.part_name))
            .unwrap_or_else(|| "bin".to_string())
    }
}

fn no_bytes() -> Arc<[u8]> {
    Arc::from(Vec::new())
}

fn pixel_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Classified images, each list in catalogue order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorizedImages {
    pub logos: Vec<ImageAsset>,
    pub backgrounds: Vec<ImageAsset>,
    pub content: Vec<ImageAsset>,
}

impl CategorizedImages {
    pub fn total(&self) -> usize {
        self.logos.len() + self.backgrounds.len() + self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Category of an image from its geometry alone.
///
/// The logo test runs before the background test; the reference slide size
/// comes from `settings`, not from the template.
pub fn classify_geometry(geometry: &Geometry, settings: &ClassifierSettings) -> ImageCategory {
    let slide_width = settings.slide_width as f64;
    let slide_height = settings.slide_height as f64;
    let area_ratio = geometry.area() / (slide_width * slide_height);
    let left = geometry.left as f64;
    let top = geometry.top as f64;

    let near_edge = left < settings.logo_edge_ratio * slide_width
        || left > (1.0 - settings.logo_edge_ratio) * slide_width;
    if area_ratio < settings.logo_max_area_ratio
        && top < settings.logo_max_top_ratio * slide_height
        && near_edge
    {
        ImageCategory::Logo
    } else if area_ratio > settings.background_min_area_ratio {
        ImageCategory::Background
    } else {
        ImageCategory::Content
    }
}

pub fn classify(images: &[ImageAsset], settings: &ClassifierSettings) -> CategorizedImages {
    let mut categorized = CategorizedImages::default();
    for image in images {
        let bucket = match classify_geometry(&image.geometry, settings) {
            ImageCategory::Logo => &mut categorized.logos,
            ImageCategory::Background => &mut categorized.backgrounds,
            ImageCategory::Content => &mut categorized.content,
        };
        bucket.push(image.clone());
    }
    categorized
}

/// Open a package and list the images on its slides.
pub fn extract_images(package_bytes: &[u8]) -> Result<Vec<ImageAsset>> {
    let doc = PmlDocument::from_bytes(package_bytes)?;
    let mut diagnostics = Vec::new();
    let images = extract_from_document(&doc, &mut diagnostics)?;
    for diagnostic in &diagnostics {
        tracing::debug!(message = %diagnostic.message, "image skipped");
    }
    Ok(images)
}

/// Images on every slide of `doc`; shapes that fail are skipped and noted in
/// `diagnostics`.
pub fn extract_from_document(
    doc: &PmlDocument,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<ImageAsset>> {
    let mut images = Vec::new();
    for slide in doc.slides()? {
        let slide_doc = match doc.package().get_xml_part(&slide.part_name) {
            Ok(slide_doc) => slide_doc,
            Err(e) => {
                diagnostics.push(degraded(slide.index, format!("{}: {}", slide.part_name, e)));
                continue;
            }
        };
        let Some(tree) = sp_tree(&slide_doc) else {
            continue;
        };
        let mut layout_doc: Option<Option<XmlDocument>> = None;

        for (shape_index, shape) in shape_nodes(&slide_doc, tree).into_iter().enumerate() {
            let Some(embed) = image_relationship_id(&slide_doc, shape) else {
                continue;
            };
            let layout = layout_doc.get_or_insert_with(|| {
                doc.slide_layout_part(&slide.part_name)
                    .and_then(|part| doc.package().get_xml_part(&part).ok())
            });
            match image_asset(doc, &slide, &slide_doc, layout.as_ref(), shape, shape_index, &embed) {
                Ok(asset) => images.push(asset),
                Err(message) => diagnostics.push(degraded(
                    slide.index,
                    format!("shape {} on slide {}: {}", shape_index, slide.index, message),
                )),
            }
        }
    }
    tracing::debug!(count = images.len(), "extracted template images");
    Ok(images)
}

fn degraded(slide_index: usize, message: String) -> Diagnostic {
    Diagnostic::new(DiagnosticKind::ExtractionDegraded, Some(slide_index), "image", message)
}

/// `r:embed` of the blip a picture, or a picture-filled shape, draws.
fn image_relationship_id(doc: &XmlDocument, shape: NodeId) -> Option<String> {
    let blip_fill = match shape_kind(doc, shape)? {
        ShapeKind::Picture => doc.find_child(shape, &P::blipFill()),
        ShapeKind::Shape => doc.find_path(shape, &[P::spPr(), A::blipFill()]),
        _ => None,
    }?;
    let blip = doc.find_child(blip_fill, &A::blip())?;
    doc.attribute(blip, &R::embed()).map(str::to_string)
}

fn image_asset(
    doc: &PmlDocument,
    slide: &SlideRef,
    slide_doc: &XmlDocument,
    layout: Option<&XmlDocument>,
    shape: NodeId,
    shape_index: usize,
    embed: &str,
) -> std::result::Result<ImageAsset, String> {
    let package = doc.package();
    let part_name = package
        .resolve_relationship_id(&slide.part_name, embed)
        .ok_or_else(|| format!("relationship {} does not resolve", embed))?;
    let bytes = package
        .get_part(&part_name)
        .ok_or_else(|| format!("media part {} is missing", part_name))?;

    let content_type = package
        .get_content_type(&part_name)
        .filter(|ct| ct.starts_with("image/"))
        .or_else(|| extension(&part_name).and_then(|ext| image_content_type(&ext)))
        .unwrap_or("application/octet-stream");

    let geometry = shape_geometry(slide_doc, shape)
        .or_else(|| inherited_geometry(slide_doc, layout?, shape))
        .ok_or_else(|| "no geometry on the shape or its layout placeholder".to_string())?;

    Ok(ImageAsset::new(
        slide.index,
        shape_index,
        Arc::from(bytes),
        &part_name,
        content_type,
        geometry,
    ))
}

/// Placeholder pictures often carry no transform of their own.
fn inherited_geometry(slide_doc: &XmlDocument, layout: &XmlDocument, shape: NodeId) -> Option<Geometry> {
    let ph = placeholder_element(slide_doc, shape)?;
    let ph_type = slide_doc.attr(ph, "type");
    let idx = slide_doc.attr(ph, "idx").and_then(|v| v.parse().ok());
    let layout_shape = matching_placeholder(layout, ph_type, idx)?;
    shape_geometry(layout, layout_shape)
}
