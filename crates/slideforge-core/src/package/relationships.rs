use crate::error::Result;
use crate::xml::namespaces::PR;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    #[serde(default)]
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn new(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::Internal,
        }
    }

    pub fn external(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            target_mode: TargetMode::External,
            ..Self::new(id, rel_type, target)
        }
    }

    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }

    /// Numeric suffix of an `rIdN` identifier, if it has one.
    pub fn numeric_id(&self) -> Option<u32> {
        self.id.strip_prefix("rId")?.parse().ok()
    }
}

/// Read the relationships listed in a `.rels` part.
pub fn parse_relationships(doc: &XmlDocument) -> Vec<Relationship> {
    let Some(root) = doc.root() else {
        return Vec::new();
    };

    doc.elements_by_name(root, &PR::Relationship())
        .filter_map(|node| {
            let id = doc.attr(node, "Id")?;
            let rel_type = doc.attr(node, "Type")?;
            let target = doc.attr(node, "Target")?;
            let rel = match doc.attr(node, "TargetMode") {
                Some(mode) if mode.eq_ignore_ascii_case("External") => {
                    Relationship::external(id, rel_type, target)
                }
                _ => Relationship::new(id, rel_type, target),
            };
            Some(rel)
        })
        .collect()
}

pub fn relationships_to_xml(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut doc = XmlDocument::new();
    let root = doc.add_root(XmlNodeData::element_with_attrs(
        PR::Relationships(),
        vec![XAttribute::xmlns("", PR::NS)],
    ));

    for rel in rels {
        let mut attrs = vec![
            XAttribute::new(XName::local("Id"), &rel.id),
            XAttribute::new(XName::local("Type"), &rel.rel_type),
            XAttribute::new(XName::local("Target"), &rel.target),
        ];
        if rel.is_external() {
            attrs.push(XAttribute::new(XName::local("TargetMode"), "External"));
        }
        doc.add_child(root, XmlNodeData::element_with_attrs(PR::Relationship(), attrs));
    }

    crate::xml::builder::serialize_bytes(&doc)
}

pub mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const NOTES_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}
