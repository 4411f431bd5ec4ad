//! Fixture builder for integration tests: writes small but complete PPTX
//! templates in memory.

#![allow(dead_code)]

use slideforge_core::pml::shapes::{placeholder_role, shape_geometry, shape_kind, shape_nodes, sp_tree};
use slideforge_core::pml::text::{shape_paragraph_texts, shape_text};
use slideforge_core::pml::{Geometry, ShapeKind};
use slideforge_core::{ContentPlan, PmlDocument, SlideContent};
use std::io::{Cursor, Read, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_LAYOUT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_MASTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_HYPERLINK: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// 2×1 RGB PNG.
pub const LOGO_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x7b, 0x40, 0xe8,
    0xdd, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0xcf, 0x00, 0x04,
    0xff, 0x01, 0x07, 0x00, 0x01, 0xff, 0xe2, 0x23, 0x9e, 0x59, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// 1×1 RGB PNG.
pub const BACKGROUND_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53,
    0xde, 0x00, 0x00, 0x00, 0x0c, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x60, 0x60, 0xf8, 0x0f,
    0x00, 0x01, 0x03, 0x01, 0x00, 0x08, 0x89, 0xc2, 0xec, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e,
    0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Geometry of every `p:pic` shape on a slide, in shape-tree order.
pub fn picture_geometries(doc: &PmlDocument, slide_part: &str) -> Vec<Geometry> {
    let slide = doc.package().get_xml_part(slide_part).unwrap();
    let tree = sp_tree(&slide).unwrap();
    shape_nodes(&slide, tree)
        .into_iter()
        .filter(|&shape| shape_kind(&slide, shape) == Some(ShapeKind::Picture))
        .filter_map(|shape| shape_geometry(&slide, shape))
        .collect()
}

/// Copy of `template` whose slide `slide_part` has lost its shape tree.
pub fn without_shape_tree(template: &[u8], slide_part: &str) -> Vec<u8> {
    let mut doc = PmlDocument::from_bytes(template).unwrap();
    let mut slide = doc.package().get_xml_part(slide_part).unwrap();
    let tree = sp_tree(&slide).unwrap();
    slide.remove(tree);
    doc.package_mut().put_xml_part(slide_part, &slide).unwrap();
    doc.to_bytes().unwrap()
}

/// Which of the two fixture layouts a slide uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureLayout {
    /// "Title Slide": `ctrTitle` + `subTitle`.
    Title,
    /// "Title and Content": `title` + body (`idx=1`) + date.
    Content,
}

#[derive(Debug, Clone)]
pub struct FixtureSlide {
    pub layout: FixtureLayout,
    pub title: String,
    pub body: Vec<String>,
    pub logo: bool,
    pub background: bool,
    /// Template slide index a body hyperlink jumps to.
    pub link_to: Option<usize>,
    pub external_link: Option<String>,
}

impl FixtureSlide {
    pub fn title(title: &str) -> Self {
        Self {
            layout: FixtureLayout::Title,
            title: title.to_string(),
            body: vec!["Subtitle".to_string()],
            logo: false,
            background: false,
            link_to: None,
            external_link: None,
        }
    }

    pub fn content(title: &str, body: &[&str]) -> Self {
        Self {
            layout: FixtureLayout::Content,
            title: title.to_string(),
            body: body.iter().map(|s| s.to_string()).collect(),
            ..Self::title(title)
        }
    }

    pub fn with_logo(mut self) -> Self {
        self.logo = true;
        self
    }

    pub fn with_background(mut self) -> Self {
        self.background = true;
        self
    }

    pub fn linking_to(mut self, slide: usize) -> Self {
        self.link_to = Some(slide);
        self
    }

    pub fn with_external_link(mut self, url: &str) -> Self {
        self.external_link = Some(url.to_string());
        self
    }
}

/// Two slides: a title slide and a content slide carrying a logo.
pub fn two_slide_template() -> Vec<u8> {
    build_template(&[
        FixtureSlide::title("Welcome"),
        FixtureSlide::content("Agenda", &["First", "Second"]).with_logo(),
    ])
}

pub fn build_template(slides: &[FixtureSlide]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut put = |name: &str, content: &[u8]| {
        zip.start_file(name, options).unwrap();
        zip.write_all(content).unwrap();
    };

    put("[Content_Types].xml", content_types(slides.len()).as_bytes());
    put("_rels/.rels", ROOT_RELS.as_bytes());
    put("docProps/core.xml", CORE_XML.as_bytes());
    put("docProps/app.xml", app_xml(slides.len()).as_bytes());
    put("ppt/presentation.xml", presentation_xml(slides.len()).as_bytes());
    put("ppt/_rels/presentation.xml.rels", presentation_rels(slides.len()).as_bytes());
    put("ppt/slideMasters/slideMaster1.xml", MASTER_XML.as_bytes());
    put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels(&[
            ("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml", false),
            ("rId2", REL_LAYOUT, "../slideLayouts/slideLayout2.xml", false),
            ("rId3", REL_THEME, "../theme/theme1.xml", false),
        ])
        .as_bytes(),
    );
    put("ppt/slideLayouts/slideLayout1.xml", TITLE_LAYOUT_XML.as_bytes());
    put("ppt/slideLayouts/slideLayout2.xml", CONTENT_LAYOUT_XML.as_bytes());
    for n in 1..=2 {
        put(
            &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", n),
            rels(&[("rId1", REL_MASTER, "../slideMasters/slideMaster1.xml", false)]).as_bytes(),
        );
    }
    put("ppt/theme/theme1.xml", THEME_XML.as_bytes());
    put("ppt/media/image1.png", LOGO_PNG);
    put("ppt/media/image2.png", BACKGROUND_PNG);

    for (i, slide) in slides.iter().enumerate() {
        put(&format!("ppt/slides/slide{}.xml", i + 1), slide_xml(slide).as_bytes());
        put(
            &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            slide_rels(slide).as_bytes(),
        );
    }

    zip.finish().unwrap().into_inner()
}

/// Text of one part of a package.
pub fn read_part(package: &[u8], name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(Cursor::new(package)).ok()?;
    let mut file = archive.by_name(name).ok()?;
    let mut text = String::new();
    file.read_to_string(&mut text).ok()?;
    Some(text)
}

pub fn part_names(package: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(package)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

pub fn plan(records: usize) -> ContentPlan {
    ContentPlan::new(
        (0..records)
            .map(|i| {
                let title = format!("Slide {}", i + 1);
                SlideContent::new(&title, &["Point A", "Point B"], None)
            })
            .collect(),
    )
}

fn rels(entries: &[(&str, &str, &str, bool)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, rel_type, target, external)| {
            let mode = if *external { r#" TargetMode="External""# } else { "" };
            format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                id, rel_type, target, mode
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        body
    )
}

fn content_types(slides: usize) -> String {
    let slide_overrides: String = (1..=slides)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slideLayouts/slideLayout2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>{}</Types>"#,
        slide_overrides
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Fixture</dc:title><dc:creator>fixture</dc:creator><cp:revision>1</cp:revision><dcterms:created xsi:type="dcterms:W3CDTF">2024-01-01T00:00:00Z</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">2024-01-01T00:00:00Z</dcterms:modified></cp:coreProperties>"#;

fn app_xml(slides: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Fixture</Application><Slides>{}</Slides><Notes>0</Notes></Properties>"#,
        slides
    )
}

fn presentation_xml(slides: usize) -> String {
    let ids: String = (0..slides)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        NS, ids
    )
}

fn presentation_rels(slides: usize) -> String {
    let mut entries = vec![
        ("rId1".to_string(), REL_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
    ];
    for i in 0..slides {
        entries.push((format!("rId{}", i + 3), REL_SLIDE, format!("slides/slide{}.xml", i + 1)));
    }
    let borrowed: Vec<(&str, &str, &str, bool)> = entries
        .iter()
        .map(|(id, t, target)| (id.as_str(), *t, target.as_str(), false))
        .collect();
    rels(&borrowed)
}

const GROUP_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

const MASTER_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="274638"/><a:ext cx="8229600" cy="1143000"/></a:xfrm></p:spPr></p:sp>"#,
    r#"</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
    r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst></p:sldMaster>"#
);

const TITLE_LAYOUT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="title" preserve="1"><p:cSld name="Title Slide"><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="685800" y="2130425"/><a:ext cx="7772400" cy="1470025"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Subtitle 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="subTitle" idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="1371600" y="3886200"/><a:ext cx="6400800" cy="1752600"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
);

const CONTENT_LAYOUT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="obj" preserve="1"><p:cSld name="Title and Content"><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="1600200"/><a:ext cx="8229600" cy="4525963"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Date Placeholder 3"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="dt" sz="half" idx="10"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
);

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Fixture"><a:themeElements><a:clrScheme name="Fixture"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Fixture"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme></a:themeElements></a:theme>"#;

fn paragraph(text: &str) -> String {
    format!(
        r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"><a:solidFill><a:srgbClr val="1F497D"/></a:solidFill><a:latin typeface="Georgia"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        text
    )
}

fn slide_xml(slide: &FixtureSlide) -> String {
    let (title_ph, body_ph) = match slide.layout {
        FixtureLayout::Title => (r#"<p:ph type="ctrTitle"/>"#, r#"<p:ph type="subTitle" idx="1"/>"#),
        FixtureLayout::Content => (r#"<p:ph type="title"/>"#, r#"<p:ph idx="1"/>"#),
    };

    let mut link = String::new();
    if slide.link_to.is_some() {
        link.push_str(r#"<a:hlinkClick r:id="rId5" action="ppaction://hlinksldjump"/>"#);
    }
    if slide.external_link.is_some() {
        link.push_str(r#"<a:hlinkHover r:id="rId6"/>"#);
    }

    let mut shapes = format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#,
        title_ph,
        paragraph(&slide.title)
    );
    let body: String = slide.body.iter().map(|line| paragraph(line)).collect();
    shapes.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Body 2">{}</p:cNvPr><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#,
        link, body_ph, body
    ));
    if slide.logo {
        shapes.push_str(&picture(4, "Logo", "rId2", (100_000, 50_000, 500_000, 400_000)));
    }
    if slide.background {
        shapes.push_str(&picture(5, "Backdrop", "rId3", (0, 0, 9_144_000, 6_858_000)));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld><p:spTree>{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        NS, GROUP_HEADER, shapes
    )
}

fn picture(id: u32, name: &str, rel_id: &str, (x, y, cx, cy): (i64, i64, i64, i64)) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
    )
}

fn slide_rels(slide: &FixtureSlide) -> String {
    let layout = match slide.layout {
        FixtureLayout::Title => "../slideLayouts/slideLayout1.xml",
        FixtureLayout::Content => "../slideLayouts/slideLayout2.xml",
    };
    let link_target = slide.link_to.map(|i| format!("slide{}.xml", i + 1));
    let mut entries = vec![("rId1", REL_LAYOUT, layout, false)];
    if slide.logo {
        entries.push(("rId2", REL_IMAGE, "../media/image1.png", false));
    }
    if slide.background {
        entries.push(("rId3", REL_IMAGE, "../media/image2.png", false));
    }
    if let Some(target) = &link_target {
        entries.push(("rId5", REL_SLIDE, target.as_str(), false));
    }
    if let Some(url) = &slide.external_link {
        entries.push(("rId6", REL_HYPERLINK, url.as_str(), true));
    }
    rels(&entries)
}

/// Title text and body paragraphs of a slide, read through its placeholders.
pub fn title_and_body(doc: &PmlDocument, slide_part: &str) -> (String, Vec<String>) {
    let slide = doc.package().get_xml_part(slide_part).unwrap();
    let tree = sp_tree(&slide).unwrap();
    let mut title = String::new();
    let mut body = Vec::new();
    for shape in shape_nodes(&slide, tree) {
        let role = placeholder_role(&slide, shape);
        if role.is_title() && title.is_empty() {
            title = shape_text(&slide, shape);
        } else if role.is_body() && body.is_empty() {
            body = shape_paragraph_texts(&slide, shape);
        }
    }
    (title, body)
}

/// Number of `p:pic` shapes directly on a slide.
pub fn picture_count(doc: &PmlDocument, slide_part: &str) -> usize {
    let slide = doc.package().get_xml_part(slide_part).unwrap();
    let tree = sp_tree(&slide).unwrap();
    shape_nodes(&slide, tree)
        .into_iter()
        .filter(|&shape| shape_kind(&slide, shape) == Some(ShapeKind::Picture))
        .count()
}
