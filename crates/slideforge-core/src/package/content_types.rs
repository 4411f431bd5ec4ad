use crate::error::Result;
use crate::xml::namespaces::CT;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indexmap::IndexMap;

/// `[Content_Types].xml`: extension defaults plus per-part overrides.
///
/// Override keys are stored without the leading `/` so they line up with
/// zip entry names.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: IndexMap<String, String>,
    overrides: IndexMap<String, String>,
}

impl ContentTypes {
    pub fn new() -> Self {
        let mut types = Self::default();
        types.add_default("rels", content_type_values::RELATIONSHIPS);
        types.add_default("xml", content_type_values::XML);
        types
    }

    pub fn parse(doc: &XmlDocument) -> Self {
        let mut types = Self::default();
        let Some(root) = doc.root() else {
            return types;
        };

        for node in doc.element_children(root) {
            let Some(content_type) = doc.attr(node, "ContentType") else {
                continue;
            };
            if doc.is_named(node, &CT::Default()) {
                if let Some(ext) = doc.attr(node, "Extension") {
                    types.add_default(ext, content_type);
                }
            } else if doc.is_named(node, &CT::Override()) {
                if let Some(part) = doc.attr(node, "PartName") {
                    types.set_override(part, content_type);
                }
            }
        }
        types
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element_with_attrs(
            CT::Types(),
            vec![XAttribute::xmlns("", CT::NS)],
        ));

        for (ext, content_type) in &self.defaults {
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(
                    CT::Default(),
                    vec![
                        XAttribute::new(XName::local("Extension"), ext),
                        XAttribute::new(XName::local("ContentType"), content_type),
                    ],
                ),
            );
        }
        for (part, content_type) in &self.overrides {
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(
                    CT::Override(),
                    vec![
                        XAttribute::new(XName::local("PartName"), &format!("/{}", part)),
                        XAttribute::new(XName::local("ContentType"), content_type),
                    ],
                ),
            );
        }

        crate::xml::builder::serialize_bytes(&doc)
    }

    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let path = path.trim_start_matches('/');
        if let Some(ct) = self.overrides.get(path) {
            return Some(ct);
        }
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults.get(&ext).map(String::as_str)
    }

    pub fn set_override(&mut self, path: &str, content_type: &str) {
        self.overrides.insert(
            path.trim_start_matches('/').to_string(),
            content_type.to_string(),
        );
    }

    pub fn remove_override(&mut self, path: &str) {
        self.overrides.shift_remove(path.trim_start_matches('/'));
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }

    pub fn has_default(&self, extension: &str) -> bool {
        self.defaults.contains_key(&extension.to_ascii_lowercase())
    }
}

pub mod content_type_values {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const NOTES_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
    pub const NOTES_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

/// Content type for an image file extension.
pub fn image_content_type(extension: &str) -> Option<&'static str> {
    let ct = match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => return None,
    };
    Some(ct)
}

/// Preferred file extension for an image content type.
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let ext = match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpeg",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/x-emf" => "emf",
        "image/x-wmf" => "wmf",
        _ => return None,
    };
    Some(ext)
}
