use crate::error::Result;
use crate::package::content_types::content_type_values;
use crate::package::relationships::relationship_types;
use crate::pml::document::{add_group_header, insert_after_any, presentation_namespaces, PmlDocument};
use crate::pml::shapes::{placeholder_role, shape_nodes, sp_tree, PlaceholderRole};
use crate::pml::text::{set_shape_text, shape_text};
use crate::xml::namespaces::{A, P, R};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;

const NOTES_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notesMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr><p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg" idx="2"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="1143000" y="685800"/><a:ext cx="4572000" cy="3429000"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" sz="quarter" idx="3"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="685800" y="4343400"/><a:ext cx="5486400" cy="4114800"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:pPr lvl="0"/><a:r><a:rPr lang="en-US"/><a:t>Click to edit Master text styles</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:notesStyle><a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:defRPr sz="1200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:notesStyle></p:notesMaster>"#;

/// Notes slide of `slide_part`, if it has one.
pub fn notes_slide_part(doc: &PmlDocument, slide_part: &str) -> Option<String> {
    doc.package()
        .first_target_of_type(slide_part, relationship_types::NOTES_SLIDE)
        .filter(|part| doc.package().contains_part(part))
}

/// Find or create the notes slide for `slide_part` and return its part name.
pub fn ensure_notes_slide(doc: &mut PmlDocument, slide_part: &str) -> Result<String> {
    if let Some(existing) = notes_slide_part(doc, slide_part) {
        return Ok(existing);
    }
    let master = ensure_notes_master(doc)?;

    let part_name = doc
        .package()
        .next_part_name("ppt/notesSlides/notesSlide", "xml");
    let notes = new_notes_slide();
    let package = doc.package_mut();
    package.put_xml_part(&part_name, &notes)?;
    package.set_content_type(&part_name, content_type_values::NOTES_SLIDE);
    package.add_relationship(&part_name, relationship_types::NOTES_MASTER, &master);
    package.add_relationship(&part_name, relationship_types::SLIDE, slide_part);
    package.add_relationship(slide_part, relationship_types::NOTES_SLIDE, &part_name);

    tracing::debug!(slide = %slide_part, notes = %part_name, "created notes slide");
    Ok(part_name)
}

/// Find the presentation's notes master, creating a default one (with a copy
/// of the first slide master's theme) when the template has none.
pub fn ensure_notes_master(doc: &mut PmlDocument) -> Result<String> {
    let main = doc.main_part().to_string();
    if let Some(existing) = doc
        .package()
        .first_target_of_type(&main, relationship_types::NOTES_MASTER)
        .filter(|part| doc.package().contains_part(part))
    {
        return Ok(existing);
    }

    let master_part = doc
        .package()
        .next_part_name("ppt/notesMasters/notesMaster", "xml");
    let theme_source = doc
        .layouts()?
        .first()
        .map(|layout| layout.master_part.clone())
        .and_then(|master| {
            doc.package()
                .first_target_of_type(&master, relationship_types::THEME)
        })
        .and_then(|theme| doc.package().get_part(&theme).map(<[u8]>::to_vec));

    let package = doc.package_mut();
    package.set_part(&master_part, NOTES_MASTER_XML.as_bytes().to_vec());
    package.set_content_type(&master_part, content_type_values::NOTES_MASTER);
    if let Some(theme_bytes) = theme_source {
        let theme_part = package.next_part_name("ppt/theme/theme", "xml");
        package.set_part(&theme_part, theme_bytes);
        package.set_content_type(&theme_part, content_type_values::THEME);
        package.add_relationship(&master_part, relationship_types::THEME, &theme_part);
    }
    let rel_id = package.add_relationship(&main, relationship_types::NOTES_MASTER, &master_part);

    let mut pres = doc.presentation()?;
    if let Some(root) = pres.root() {
        let list = match pres.find_child(root, &P::notesMasterIdLst()) {
            Some(list) => list,
            None => insert_after_any(&mut pres, root, &[P::sldMasterIdLst()], P::notesMasterIdLst()),
        };
        pres.clear_children(list);
        pres.add_child(
            list,
            XmlNodeData::element_with_attrs(P::notesMasterId(), vec![XAttribute::new(R::id(), &rel_id)]),
        );
        doc.package_mut().put_xml_part(&main, &pres)?;
    }

    tracing::debug!(part = %master_part, "created default notes master");
    Ok(master_part)
}

fn new_notes_slide() -> XmlDocument {
    let mut doc = XmlDocument::new();
    let root = doc.add_root(XmlNodeData::element_with_attrs(
        P::notes(),
        presentation_namespaces(),
    ));
    let c_sld = doc.add_child(root, XmlNodeData::element(P::cSld()));
    let tree = doc.add_child(c_sld, XmlNodeData::element(P::spTree()));
    add_group_header(&mut doc, tree);
    add_placeholder(&mut doc, tree, 2, "Slide Image Placeholder 1", "sldImg", None);
    add_placeholder(&mut doc, tree, 3, "Notes Placeholder 2", "body", Some("1"));

    let clr = doc.add_child(root, XmlNodeData::element(P::clrMapOvr()));
    doc.add_child(clr, XmlNodeData::element(XName::new(A::NS, "masterClrMapping")));
    doc
}

fn add_placeholder(
    doc: &mut XmlDocument,
    tree: NodeId,
    id: u32,
    name: &str,
    ph_type: &str,
    idx: Option<&str>,
) -> NodeId {
    let sp = doc.add_child(tree, XmlNodeData::element(P::sp()));
    let nv = doc.add_child(sp, XmlNodeData::element(P::nvSpPr()));
    doc.add_child(
        nv,
        XmlNodeData::element_with_attrs(
            P::cNvPr(),
            vec![
                XAttribute::new(XName::local("id"), &id.to_string()),
                XAttribute::new(XName::local("name"), name),
            ],
        ),
    );
    let c_nv_sp = doc.add_child(nv, XmlNodeData::element(P::cNvSpPr()));
    doc.add_child(
        c_nv_sp,
        XmlNodeData::element_with_attrs(A::spLocks(), vec![XAttribute::new(XName::local("noGrp"), "1")]),
    );
    let nv_pr = doc.add_child(nv, XmlNodeData::element(P::nvPr()));
    let mut ph_attrs = vec![XAttribute::new(XName::local("type"), ph_type)];
    if let Some(idx) = idx {
        ph_attrs.push(XAttribute::new(XName::local("idx"), idx));
    }
    doc.add_child(nv_pr, XmlNodeData::element_with_attrs(P::ph(), ph_attrs));
    doc.add_child(sp, XmlNodeData::element(P::spPr()));
    sp
}

fn notes_body(doc: &XmlDocument) -> Option<NodeId> {
    let tree = sp_tree(doc)?;
    shape_nodes(doc, tree)
        .into_iter()
        .find(|&shape| placeholder_role(doc, shape) == PlaceholderRole::Body)
}

/// Set the speaker notes of a slide, one paragraph per line.
pub fn set_notes_text(doc: &mut PmlDocument, slide_part: &str, text: &str) -> Result<()> {
    let part = ensure_notes_slide(doc, slide_part)?;
    let mut notes = doc.package().get_xml_part(&part)?;

    let body = match notes_body(&notes) {
        Some(body) => body,
        None => {
            let tree = sp_tree(&notes).ok_or_else(|| {
                crate::error::SlideforgeError::invalid_package(format!("{} has no shape tree", part))
            })?;
            let id = crate::pml::shapes::next_shape_id(&notes);
            add_placeholder(&mut notes, tree, id, "Notes Placeholder", "body", Some("1"))
        }
    };
    set_shape_text(&mut notes, body, text);
    doc.package_mut().put_xml_part(&part, &notes)
}

/// Speaker notes text of a slide; `None` without a notes slide.
pub fn notes_text(doc: &PmlDocument, slide_part: &str) -> Option<String> {
    let part = notes_slide_part(doc, slide_part)?;
    let notes = doc.package().get_xml_part(&part).ok()?;
    notes_body(&notes).map(|body| shape_text(&notes, body))
}
