mod common;

use common::{build_template, two_slide_template, FixtureSlide};
use pretty_assertions::assert_eq;
use slideforge_core::pml::Geometry;
use slideforge_core::synth::{
    classify_geometry, extract_images, ClassifierSettings, DiagnosticKind, ImageCategory,
};
use slideforge_core::{PmlDocument, SlideforgeError, SynthesisSettings, TemplateAnalyzer};

#[test]
fn layouts_report_names_and_roles() {
    let metadata =
        TemplateAnalyzer::analyze(&two_slide_template(), &SynthesisSettings::default()).unwrap();

    assert_eq!(metadata.layout_count, 2);
    let names: Vec<&str> = metadata.layouts.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Title Slide", "Title and Content"]);

    let title = &metadata.layouts[0];
    assert!(title.has_title);
    assert!(!title.has_body);

    let content = &metadata.layouts[1];
    assert!(content.has_title);
    assert!(content.has_body);
    assert_eq!(content.placeholders.len(), 3);
    assert!(metadata.image_placeholders.is_empty());
}

#[test]
fn slide_size_count_and_theme_sample() {
    let metadata =
        TemplateAnalyzer::analyze(&two_slide_template(), &SynthesisSettings::default()).unwrap();

    assert_eq!(metadata.slide_size, Some((9_144_000, 6_858_000)));
    assert_eq!(metadata.slide_count, 2);
    assert_eq!(metadata.theme.colors, vec!["1F497D"]);
    assert_eq!(metadata.theme.fonts, vec!["Georgia"]);
    assert!(metadata.theme.note.is_none());
    assert!(metadata.diagnostics.is_empty());
}

#[test]
fn images_are_extracted_and_categorized() {
    let template = build_template(&[
        FixtureSlide::content("Branded", &["a"]).with_logo(),
        FixtureSlide::content("Backdrop", &["b"]).with_background(),
    ]);
    let metadata = TemplateAnalyzer::analyze(&template, &SynthesisSettings::default()).unwrap();

    assert_eq!(metadata.images.total(), 2);
    let categorized = &metadata.images.categorized;
    assert_eq!(categorized.logos.len(), 1);
    assert_eq!(categorized.backgrounds.len(), 1);
    assert!(categorized.content.is_empty());

    let logo = &categorized.logos[0];
    assert_eq!(logo.source_slide_index, 0);
    assert_eq!(logo.part_name, "ppt/media/image1.png");
    assert_eq!(logo.content_type, "image/png");
    assert_eq!(logo.geometry, Geometry::new(100_000, 50_000, 500_000, 400_000));
    assert_eq!(logo.byte_len, common::LOGO_PNG.len());
    assert_eq!(categorized.backgrounds[0].source_slide_index, 1);
}

#[test]
fn extract_images_lists_slide_pictures_in_order() {
    let template = build_template(&[
        FixtureSlide::content("One", &["a"]).with_logo().with_background(),
        FixtureSlide::content("Two", &["b"]),
    ]);
    let images = extract_images(&template).unwrap();

    let names: Vec<&str> = images.iter().map(|i| i.part_name.as_str()).collect();
    assert_eq!(names, vec!["ppt/media/image1.png", "ppt/media/image2.png"]);
    assert!(images.iter().all(|i| i.source_slide_index == 0));
    assert_ne!(images[0].content_key, images[1].content_key);
}

#[test]
fn metadata_json_leaves_out_image_bytes() {
    let metadata =
        TemplateAnalyzer::analyze(&two_slide_template(), &SynthesisSettings::default()).unwrap();
    let json = metadata.to_json();

    assert!(json.contains("\"Title and Content\""));
    assert!(json.contains("\"byte_len\""));
    assert!(!json.contains("\"bytes\""));
}

#[test]
fn template_without_slides_still_analyzes() {
    let metadata =
        TemplateAnalyzer::analyze(&build_template(&[]), &SynthesisSettings::default()).unwrap();

    assert_eq!(metadata.slide_count, 0);
    assert_eq!(metadata.layout_count, 2);
    assert_eq!(metadata.images.total(), 0);
    assert!(metadata.theme.note.is_some());
}

#[test]
fn unreadable_bytes_are_rejected() {
    let err = TemplateAnalyzer::analyze(b"PK but not really", &SynthesisSettings::default())
        .unwrap_err();
    assert!(matches!(err, SlideforgeError::InvalidPackage { .. }));
}

#[test]
fn unreadable_master_degrades_instead_of_failing() {
    let mut doc = PmlDocument::from_bytes(&two_slide_template()).unwrap();
    doc.package_mut().set_part(
        "ppt/slideMasters/slideMaster1.xml",
        b"<p:sldMaster><p:cSld>".to_vec(),
    );
    let template = doc.to_bytes().unwrap();

    let metadata = TemplateAnalyzer::analyze(&template, &SynthesisSettings::default()).unwrap();

    let names: Vec<&str> = metadata.layouts.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Title Slide", "Title and Content"]);
    assert_eq!(metadata.slide_count, 2);
    assert_eq!(metadata.diagnostics.len(), 1);
    let diagnostic = &metadata.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::ExtractionDegraded);
    assert_eq!(diagnostic.field, "master");
    assert!(diagnostic.message.contains("slideMaster1.xml"));
}

#[test]
fn classifier_checks_logo_before_background() {
    let settings = ClassifierSettings::default();

    let corner = Geometry::new(100_000, 50_000, 500_000, 400_000);
    assert_eq!(classify_geometry(&corner, &settings), ImageCategory::Logo);

    let right_edge = Geometry::new(8_000_000, 100_000, 500_000, 400_000);
    assert_eq!(classify_geometry(&right_edge, &settings), ImageCategory::Logo);

    let full = Geometry::new(0, 0, 9_144_000, 6_858_000);
    assert_eq!(classify_geometry(&full, &settings), ImageCategory::Background);

    let centered = Geometry::new(4_000_000, 100_000, 500_000, 400_000);
    assert_eq!(classify_geometry(&centered, &settings), ImageCategory::Content);

    let low = Geometry::new(100_000, 3_000_000, 500_000, 400_000);
    assert_eq!(classify_geometry(&low, &settings), ImageCategory::Content);
}

#[test]
fn classifier_uses_configured_reference_size() {
    let settings = ClassifierSettings {
        slide_width: 12_192_000,
        ..ClassifierSettings::default()
    };
    // within 0.2 of the left edge of a widescreen slide but not of a 4:3 one
    let geometry = Geometry::new(2_000_000, 100_000, 500_000, 400_000);
    assert_eq!(classify_geometry(&geometry, &settings), ImageCategory::Logo);
    assert_eq!(
        classify_geometry(&geometry, &ClassifierSettings::default()),
        ImageCategory::Content
    );
}
