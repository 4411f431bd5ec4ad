use crate::error::{Result, SlideforgeError};
use crate::package::content_types::content_type_values;
use crate::package::relationships::relationship_types;
use crate::package::OoxmlPackage;
use crate::pml::shapes::{placeholder_element, shape_kind, shape_nodes, sp_tree, Emu, ShapeKind};
use crate::xml::namespaces::{A, EP, P, P14, R};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;
use serde::{Deserialize, Serialize};

/// Slide ids below this value are reserved.
const MIN_SLIDE_ID: u32 = 256;

/// Placeholder types a fresh slide does not inherit from its layout.
const SKIPPED_LAYOUT_PLACEHOLDERS: [&str; 3] = ["dt", "ftr", "sldNum"];

/// A slide as listed in `p:sldIdLst`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRef {
    /// Position in presentation order.
    pub index: usize,
    pub slide_id: u32,
    /// Presentation relationship id.
    pub rel_id: String,
    pub part_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRef {
    /// Position across all masters, in master order.
    pub index: usize,
    pub part_name: String,
    pub master_part: String,
}

pub struct PmlDocument {
    package: OoxmlPackage,
    main_part: String,
}

impl PmlDocument {
    /// Open a presentation package. Every failure to read the archive or
    /// locate `p:presentation` is reported as [`SlideforgeError::InvalidPackage`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let package = OoxmlPackage::open(bytes).map_err(|e| match e {
            SlideforgeError::InvalidPackage { .. } => e,
            other => SlideforgeError::invalid_package(format!("unreadable archive: {}", other)),
        })?;
        Self::from_package(package)
    }

    pub fn from_package(package: OoxmlPackage) -> Result<Self> {
        let main_part = package
            .first_target_of_type("", relationship_types::OFFICE_DOCUMENT)
            .ok_or_else(|| SlideforgeError::invalid_package("no officeDocument relationship"))?;

        let doc = package.get_xml_part(&main_part).map_err(|e| {
            SlideforgeError::invalid_package(format!("{}: {}", main_part, e))
        })?;
        let is_presentation = doc
            .root()
            .map(|root| doc.is_named(root, &P::presentation()))
            .unwrap_or(false);
        if !is_presentation {
            return Err(SlideforgeError::invalid_package(format!(
                "{} is not a presentation part",
                main_part
            )));
        }

        Ok(Self { package, main_part })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.save()
    }

    pub fn package(&self) -> &OoxmlPackage {
        &self.package
    }

    pub fn package_mut(&mut self) -> &mut OoxmlPackage {
        &mut self.package
    }

    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    pub fn presentation(&self) -> Result<XmlDocument> {
        self.package.get_xml_part(&self.main_part)
    }

    fn presentation_root(&self) -> Result<(XmlDocument, NodeId)> {
        let doc = self.presentation()?;
        let root = doc
            .root()
            .ok_or_else(|| SlideforgeError::missing_part(&self.main_part))?;
        Ok((doc, root))
    }

    pub fn slides(&self) -> Result<Vec<SlideRef>> {
        let (pres, root) = self.presentation_root()?;
        let Some(list) = pres.find_child(root, &P::sldIdLst()) else {
            return Ok(Vec::new());
        };

        let slides = pres
            .elements_by_name(list, &P::sldId())
            .filter_map(|entry| {
                let slide_id = pres.attr(entry, "id")?.parse().ok()?;
                let rel_id = pres.attribute(entry, &R::id())?;
                let part_name = self.package.resolve_relationship_id(&self.main_part, rel_id)?;
                if !self.package.contains_part(&part_name) {
                    tracing::warn!(rel_id, part = %part_name, "slide entry points at a missing part");
                    return None;
                }
                Some((slide_id, rel_id.to_string(), part_name))
            })
            .enumerate()
            .map(|(index, (slide_id, rel_id, part_name))| SlideRef {
                index,
                slide_id,
                rel_id,
                part_name,
            })
            .collect();
        Ok(slides)
    }

    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.slides()?.len())
    }

    /// Slide master parts in `sldMasterIdLst` order.
    pub fn slide_masters(&self) -> Result<Vec<String>> {
        let (pres, root) = self.presentation_root()?;
        let masters: Vec<String> = match pres.find_child(root, &P::sldMasterIdLst()) {
            Some(list) => pres
                .elements_by_name(list, &P::sldMasterId())
                .filter_map(|entry| pres.attribute(entry, &R::id()))
                .filter_map(|id| self.package.resolve_relationship_id(&self.main_part, id))
                .collect(),
            None => self
                .package
                .targets_of_type(&self.main_part, relationship_types::SLIDE_MASTER),
        };
        Ok(masters
            .into_iter()
            .filter(|master| self.package.contains_part(master))
            .collect())
    }

    /// Layouts of every master, masters in `sldMasterIdLst` order.
    ///
    /// A master that does not parse still contributes the layouts it relates
    /// to, in relationship order.
    pub fn layouts(&self) -> Result<Vec<LayoutRef>> {
        let mut layouts: Vec<LayoutRef> = Vec::new();
        for master in self.slide_masters()? {
            let listed: Vec<String> = match self.package.get_xml_part(&master) {
                Ok(master_doc) => master_doc
                    .root()
                    .and_then(|r| master_doc.find_child(r, &P::sldLayoutIdLst()))
                    .map(|list| {
                        master_doc
                            .elements_by_name(list, &P::sldLayoutId())
                            .filter_map(|entry| master_doc.attribute(entry, &R::id()))
                            .filter_map(|id| self.package.resolve_relationship_id(&master, id))
                            .collect()
                    })
                    .unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(master = %master, error = %e, "unreadable slide master");
                    Vec::new()
                }
            };
            let parts = if listed.is_empty() {
                self.package
                    .targets_of_type(&master, relationship_types::SLIDE_LAYOUT)
            } else {
                listed
            };

            for part_name in parts {
                if !self.package.contains_part(&part_name)
                    || layouts.iter().any(|l| l.part_name == part_name)
                {
                    continue;
                }
                layouts.push(LayoutRef {
                    index: layouts.len(),
                    part_name,
                    master_part: master.clone(),
                });
            }
        }
        Ok(layouts)
    }

    pub fn slide_layout_part(&self, slide_part: &str) -> Option<String> {
        self.package
            .first_target_of_type(slide_part, relationship_types::SLIDE_LAYOUT)
    }

    /// `(cx, cy)` from `p:sldSz`.
    pub fn slide_size(&self) -> Option<(Emu, Emu)> {
        let (pres, root) = self.presentation_root().ok()?;
        let size = pres.find_child(root, &P::sldSz())?;
        Some((pres.attr_i64(size, "cx")?, pres.attr_i64(size, "cy")?))
    }

    /// Append a new slide bound to `layout_part`, holding fresh copies of the
    /// layout's content placeholders.
    pub fn add_slide(&mut self, layout_part: &str) -> Result<SlideRef> {
        let layout = self.package.get_xml_part(layout_part)?;
        let slide_doc = new_slide_from_layout(&layout);

        let part_name = self.package.next_part_name("ppt/slides/slide", "xml");
        self.package.put_xml_part(&part_name, &slide_doc)?;
        self.package
            .set_content_type(&part_name, content_type_values::SLIDE);
        self.package
            .add_relationship(&part_name, relationship_types::SLIDE_LAYOUT, layout_part);
        let rel_id = self
            .package
            .add_relationship(&self.main_part, relationship_types::SLIDE, &part_name);

        let (mut pres, root) = self.presentation_root()?;
        let list = match pres.find_child(root, &P::sldIdLst()) {
            Some(list) => list,
            None => insert_after_any(
                &mut pres,
                root,
                &[P::handoutMasterIdLst(), P::notesMasterIdLst(), P::sldMasterIdLst()],
                P::sldIdLst(),
            ),
        };

        let slide_id = pres
            .elements_by_name(list, &P::sldId())
            .filter_map(|entry| pres.attr(entry, "id").and_then(|v| v.parse::<u32>().ok()))
            .max()
            .map(|max| max + 1)
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID);
        let index = pres.elements_by_name(list, &P::sldId()).count();

        pres.add_child(
            list,
            XmlNodeData::element_with_attrs(
                P::sldId(),
                vec![
                    XAttribute::new(XName::local("id"), &slide_id.to_string()),
                    XAttribute::new(R::id(), &rel_id),
                ],
            ),
        );
        register_in_last_section(&mut pres, root, slide_id);
        self.package.put_xml_part(&self.main_part, &pres)?;

        tracing::debug!(slide = %part_name, layout = %layout_part, slide_id, "added slide");

        Ok(SlideRef {
            index,
            slide_id,
            rel_id,
            part_name,
        })
    }

    /// Detach a slide from the presentation and delete its part.
    ///
    /// Removes the `sldIdLst` entry, custom-show and section references, the
    /// presentation relationship, the slide part with its relationships and
    /// content type, and the slide's notes slide.
    pub fn remove_slide(&mut self, slide: &SlideRef) -> Result<()> {
        let (mut pres, root) = self.presentation_root()?;
        let slide_id = slide.slide_id.to_string();

        let stale: Vec<NodeId> = pres
            .descendants(root)
            .filter(|&node| {
                let list_entry = (pres.is_named(node, &P::sldId()) || pres.is_named(node, &P::sld()))
                    && pres.attribute(node, &R::id()) == Some(slide.rel_id.as_str());
                let section_entry = pres.is_named(node, &P14::sldId())
                    && pres.attr(node, "id") == Some(slide_id.as_str());
                list_entry || section_entry
            })
            .collect();
        for node in stale {
            pres.remove(node);
        }
        self.package.put_xml_part(&self.main_part, &pres)?;

        if let Some(notes) = self
            .package
            .first_target_of_type(&slide.part_name, relationship_types::NOTES_SLIDE)
        {
            self.package.delete_part(&notes);
        }
        self.package
            .remove_relationship(&self.main_part, &slide.rel_id);
        self.package.delete_part(&slide.part_name);

        tracing::debug!(slide = %slide.part_name, "removed slide");
        Ok(())
    }

    /// Bring `docProps/app.xml` counters in line with the slide list.
    pub fn update_app_properties(&mut self) -> Result<()> {
        let part = self
            .package
            .first_target_of_type("", relationship_types::EXTENDED_PROPERTIES)
            .unwrap_or_else(|| "docProps/app.xml".to_string());
        if !self.package.contains_part(&part) {
            return Ok(());
        }

        let slides = self.slides()?;
        let notes = slides
            .iter()
            .filter(|s| {
                self.package
                    .first_target_of_type(&s.part_name, relationship_types::NOTES_SLIDE)
                    .is_some()
            })
            .count();

        let mut doc = self.package.get_xml_part(&part)?;
        let Some(root) = doc.root() else {
            return Ok(());
        };
        for (name, value) in [(EP::Slides(), slides.len()), (EP::Notes(), notes)] {
            if let Some(node) = doc.find_child(root, &name) {
                doc.clear_children(node);
                doc.add_child(node, XmlNodeData::text(&value.to_string()));
            }
        }
        self.package.put_xml_part(&part, &doc)
    }
}

/// Insert `name` as a child of `parent` right after the last present element
/// among `after` (searched in order), or first when none is present.
pub(crate) fn insert_after_any(
    doc: &mut XmlDocument,
    parent: NodeId,
    after: &[XName],
    name: XName,
) -> NodeId {
    let anchor = after.iter().find_map(|n| doc.find_child(parent, n));
    match anchor {
        Some(anchor) => doc.add_after(anchor, XmlNodeData::element(name)),
        None => doc.add_first_child(parent, XmlNodeData::element(name)),
    }
}

fn register_in_last_section(pres: &mut XmlDocument, root: NodeId, slide_id: u32) {
    let Some(section_list) = pres.find_descendant(root, &P14::sectionLst()) else {
        return;
    };
    let Some(section) = pres.elements_by_name(section_list, &P14::section()).last() else {
        return;
    };
    let ids = pres.ensure_child(section, &P14::sldIdLst());
    pres.add_child(
        ids,
        XmlNodeData::element_with_attrs(
            P14::sldId(),
            vec![XAttribute::new(XName::local("id"), &slide_id.to_string())],
        ),
    );
}

fn element(doc: &mut XmlDocument, parent: NodeId, name: XName, attrs: &[(&str, &str)]) -> NodeId {
    let attributes = attrs
        .iter()
        .map(|(k, v)| XAttribute::new(XName::local(k), v))
        .collect();
    doc.add_child(parent, XmlNodeData::element_with_attrs(name, attributes))
}

/// Empty group properties every shape tree starts with.
pub(crate) fn add_group_header(doc: &mut XmlDocument, tree: NodeId) {
    let nv = element(doc, tree, P::nvGrpSpPr(), &[]);
    element(doc, nv, P::cNvPr(), &[("id", "1"), ("name", "")]);
    element(doc, nv, P::cNvGrpSpPr(), &[]);
    element(doc, nv, P::nvPr(), &[]);

    let props = element(doc, tree, P::grpSpPr(), &[]);
    let xfrm = element(doc, props, A::xfrm(), &[]);
    element(doc, xfrm, A::off(), &[("x", "0"), ("y", "0")]);
    element(doc, xfrm, A::ext(), &[("cx", "0"), ("cy", "0")]);
    element(doc, xfrm, A::chOff(), &[("x", "0"), ("y", "0")]);
    element(doc, xfrm, A::chExt(), &[("cx", "0"), ("cy", "0")]);
}

pub(crate) fn presentation_namespaces() -> Vec<XAttribute> {
    vec![
        XAttribute::xmlns("a", A::NS),
        XAttribute::xmlns("r", R::NS),
        XAttribute::xmlns("p", P::NS),
    ]
}

/// Slide XML holding an empty copy of each content placeholder of `layout`.
fn new_slide_from_layout(layout: &XmlDocument) -> XmlDocument {
    let mut doc = XmlDocument::new();
    let root = doc.add_root(XmlNodeData::element_with_attrs(
        P::sld(),
        presentation_namespaces(),
    ));
    let c_sld = element(&mut doc, root, P::cSld(), &[]);
    let tree = element(&mut doc, c_sld, P::spTree(), &[]);
    add_group_header(&mut doc, tree);

    let mut next_id = 2u32;
    if let Some(layout_tree) = sp_tree(layout) {
        for shape in shape_nodes(layout, layout_tree) {
            if shape_kind(layout, shape) != Some(ShapeKind::Shape) {
                continue;
            }
            let Some(ph) = placeholder_element(layout, shape) else {
                continue;
            };
            let ph_type = layout.attr(ph, "type");
            if ph_type.is_some_and(|t| SKIPPED_LAYOUT_PLACEHOLDERS.contains(&t)) {
                continue;
            }

            let name = crate::pml::shapes::shape_name(layout, shape).unwrap_or_default();
            let ph_attrs: Vec<XAttribute> = ["type", "orient", "sz", "idx"]
                .iter()
                .filter_map(|key| {
                    layout
                        .attr(ph, key)
                        .map(|value| XAttribute::new(XName::local(key), value))
                })
                .collect();

            let sp = element(&mut doc, tree, P::sp(), &[]);
            let nv = element(&mut doc, sp, P::nvSpPr(), &[]);
            let id = next_id.to_string();
            element(&mut doc, nv, P::cNvPr(), &[("id", id.as_str()), ("name", name.as_str())]);
            let c_nv_sp = element(&mut doc, nv, P::cNvSpPr(), &[]);
            element(&mut doc, c_nv_sp, A::spLocks(), &[("noGrp", "1")]);
            let nv_pr = element(&mut doc, nv, P::nvPr(), &[]);
            doc.add_child(nv_pr, XmlNodeData::element_with_attrs(P::ph(), ph_attrs));
            element(&mut doc, sp, P::spPr(), &[]);

            if ph_type != Some("pic") {
                let body = element(&mut doc, sp, P::txBody(), &[]);
                element(&mut doc, body, A::bodyPr(), &[]);
                element(&mut doc, body, A::lstStyle(), &[]);
                element(&mut doc, body, A::p(), &[]);
            }
            next_id += 1;
        }
    }

    let clr = element(&mut doc, root, P::clrMapOvr(), &[]);
    element(&mut doc, clr, XName::new(A::NS, "masterClrMapping"), &[]);
    doc
}
