use crate::error::Result;
use crate::pml::shapes::{placeholder_info, shape_nodes, sp_tree};
use crate::pml::{Emu, Geometry, LayoutRef, PlaceholderInfo, PlaceholderRole, PmlDocument};
use crate::synth::images::{classify, extract_from_document, CategorizedImages, ImageAsset};
use crate::synth::report::{Diagnostic, DiagnosticKind};
use crate::synth::settings::SynthesisSettings;
use crate::xml::namespaces::{A, P};
use crate::xml::XmlDocument;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// One slide layout and the placeholders it offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub index: usize,
    pub name: String,
    pub part_name: String,
    pub placeholders: Vec<PlaceholderInfo>,
    pub has_title: bool,
    pub has_body: bool,
}

impl LayoutInfo {
    pub fn roles(&self) -> Vec<PlaceholderRole> {
        self.placeholders.iter().map(|p| p.role).collect()
    }
}

/// A picture placeholder offered by a layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePlaceholder {
    pub layout_index: usize,
    pub layout_name: String,
    pub idx: Option<u32>,
    pub name: String,
    pub geometry: Option<Geometry>,
}

/// Colors and fonts seen on template slides. Advisory only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeSample {
    /// `RRGGBB` values from solid fills.
    pub colors: Vec<String>,
    /// Latin typefaces named on runs.
    pub fonts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageCatalogue {
    pub assets: Vec<ImageAsset>,
    pub categorized: CategorizedImages,
}

impl ImageCatalogue {
    pub fn total(&self) -> usize {
        self.assets.len()
    }
}

/// Read-only summary of a template, produced once per synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub layout_count: usize,
    pub layouts: Vec<LayoutInfo>,
    pub image_placeholders: Vec<ImagePlaceholder>,
    pub theme: ThemeSample,
    /// `(width, height)` from the presentation, when stated.
    pub slide_size: Option<(Emu, Emu)>,
    pub slide_count: usize,
    pub images: ImageCatalogue,
    pub diagnostics: Vec<Diagnostic>,
}

impl TemplateMetadata {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

pub struct TemplateAnalyzer;

impl TemplateAnalyzer {
    /// Analyze template bytes. Fails only when the bytes are not a readable
    /// presentation; partial extraction problems end up in `diagnostics`.
    pub fn analyze(package_bytes: &[u8], settings: &SynthesisSettings) -> Result<TemplateMetadata> {
        let doc = PmlDocument::from_bytes(package_bytes)?;
        Self::analyze_document(&doc, settings)
    }

    pub fn analyze_document(doc: &PmlDocument, settings: &SynthesisSettings) -> Result<TemplateMetadata> {
        let _span = tracing::info_span!("analyze_template").entered();
        let mut diagnostics = Vec::new();

        for master in doc.slide_masters()? {
            if let Err(e) = doc.package().get_xml_part(&master) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ExtractionDegraded,
                    None,
                    "master",
                    format!("{}: {}", master, e),
                ));
            }
        }
        let layouts: Vec<LayoutInfo> = doc
            .layouts()?
            .iter()
            .map(|layout| describe_layout(doc, layout, &mut diagnostics))
            .collect();
        let image_placeholders = layouts
            .iter()
            .flat_map(|layout| {
                layout
                    .placeholders
                    .iter()
                    .filter(|p| p.role == PlaceholderRole::Picture)
                    .map(move |p| ImagePlaceholder {
                        layout_index: layout.index,
                        layout_name: layout.name.clone(),
                        idx: p.idx,
                        name: p.name.clone(),
                        geometry: p.geometry,
                    })
            })
            .collect();

        let slide_docs: Vec<(usize, XmlDocument)> = doc
            .slides()?
            .into_iter()
            .filter_map(|slide| match doc.package().get_xml_part(&slide.part_name) {
                Ok(slide_doc) => Some((slide.index, slide_doc)),
                Err(e) => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::ExtractionDegraded,
                        Some(slide.index),
                        "theme",
                        format!("{}: {}", slide.part_name, e),
                    ));
                    None
                }
            })
            .collect();
        let theme = sample_theme(&slide_docs, settings);

        let assets = extract_from_document(doc, &mut diagnostics)?;
        let categorized = classify(&assets, &settings.classifier);

        for diagnostic in &diagnostics {
            tracing::warn!(field = %diagnostic.field, "{}", diagnostic.message);
        }
        tracing::info!(
            layouts = layouts.len(),
            slides = slide_docs.len(),
            images = assets.len(),
            logos = categorized.logos.len(),
            backgrounds = categorized.backgrounds.len(),
            "analyzed template"
        );

        Ok(TemplateMetadata {
            layout_count: layouts.len(),
            layouts,
            image_placeholders,
            theme,
            slide_size: doc.slide_size(),
            slide_count: slide_docs.len(),
            images: ImageCatalogue { assets, categorized },
            diagnostics,
        })
    }
}

fn describe_layout(doc: &PmlDocument, layout: &LayoutRef, diagnostics: &mut Vec<Diagnostic>) -> LayoutInfo {
    let mut info = LayoutInfo {
        index: layout.index,
        name: String::new(),
        part_name: layout.part_name.clone(),
        placeholders: Vec::new(),
        has_title: false,
        has_body: false,
    };

    let layout_doc = match doc.package().get_xml_part(&layout.part_name) {
        Ok(layout_doc) => layout_doc,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::ExtractionDegraded,
                None,
                "layout",
                format!("{}: {}", layout.part_name, e),
            ));
            return info;
        }
    };

    info.name = layout_doc
        .root()
        .and_then(|root| layout_doc.find_child(root, &P::cSld()))
        .and_then(|c_sld| layout_doc.attr(c_sld, "name"))
        .unwrap_or_default()
        .to_string();

    if let Some(tree) = sp_tree(&layout_doc) {
        info.placeholders = shape_nodes(&layout_doc, tree)
            .into_iter()
            .filter_map(|shape| placeholder_info(&layout_doc, shape))
            .collect();
    }
    info.has_title = info.placeholders.iter().any(|p| p.role.is_title());
    info.has_body = info.placeholders.iter().any(|p| p.role.is_body());
    info
}

/// Sample fill colors and run fonts from slide content, deduplicated and capped.
fn sample_theme(slides: &[(usize, XmlDocument)], settings: &SynthesisSettings) -> ThemeSample {
    let mut colors: IndexSet<String> = IndexSet::new();
    let mut fonts: IndexSet<String> = IndexSet::new();

    for (_, slide) in slides {
        let Some(root) = slide.root() else {
            continue;
        };
        for node in slide.descendants(root) {
            if slide.is_named(node, &A::srgbClr()) {
                let in_solid_fill = slide
                    .parent(node)
                    .map(|parent| slide.is_named(parent, &A::solidFill()))
                    .unwrap_or(false);
                if let (true, Some(value)) = (in_solid_fill, slide.attr(node, "val")) {
                    if colors.len() < settings.max_theme_colors {
                        colors.insert(value.to_ascii_uppercase());
                    }
                }
            } else if slide.is_named(node, &A::latin()) {
                if let Some(face) = slide.attr(node, "typeface") {
                    // "+mj-lt"/"+mn-lt" defer to the theme font scheme.
                    if !face.is_empty() && !face.starts_with('+') && fonts.len() < settings.max_theme_fonts {
                        fonts.insert(face.to_string());
                    }
                }
            }
        }
    }

    let note = (colors.is_empty() && fonts.is_empty())
        .then(|| "no explicit colors or fonts on template slides".to_string());
    ThemeSample {
        colors: colors.into_iter().collect(),
        fonts: fonts.into_iter().collect(),
        note,
    }
}
