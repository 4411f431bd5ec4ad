use crate::error::{Result, SlideforgeError};
use crate::xml::namespaces::{CP, DC, DCTERMS, XSI};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;
use std::io::{Cursor, Read, Write};
use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use super::content_types::ContentTypes;
use super::parts::{rels_part_name, relative_target, resolve_relative, source_for_rels_part};
use super::relationships::{parse_relationships, relationships_to_xml, Relationship};

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Core document properties extracted from docProps/core.xml
#[derive(Debug, Clone, Default)]
pub struct CoreProperties {
    /// Last person who modified the document (cp:lastModifiedBy)
    pub last_modified_by: Option<String>,
    /// Original creator of the document (dc:creator)
    pub creator: Option<String>,
    /// Date/time the document was last modified (dcterms:modified)
    pub modified: Option<String>,
}

/// An OPC package held fully in memory.
///
/// Parts keep the order they had in the source archive, new parts go at the
/// end. Relationships are keyed by the part that owns them, with the package
/// root under the empty string, and are re-serialized on save.
#[derive(Debug, Clone)]
pub struct OoxmlPackage {
    parts: IndexMap<String, Vec<u8>>,
    content_types: ContentTypes,
    relationships: IndexMap<String, Vec<Relationship>>,
}

impl OoxmlPackage {
    pub fn new() -> Self {
        Self {
            parts: IndexMap::new(),
            content_types: ContentTypes::new(),
            relationships: IndexMap::new(),
        }
    }

    pub fn open(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let mut parts = IndexMap::new();
        let mut content_types = None;
        let mut relationships = IndexMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;

            if name == CONTENT_TYPES_PART {
                let doc = crate::xml::parser::parse_bytes(&content)?;
                content_types = Some(ContentTypes::parse(&doc));
            } else if let Some(source) = source_for_rels_part(&name) {
                let doc = crate::xml::parser::parse_bytes(&content)?;
                relationships.insert(source, parse_relationships(&doc));
            } else {
                parts.insert(name, content);
            }
        }

        let content_types = content_types
            .ok_or_else(|| SlideforgeError::invalid_package("missing [Content_Types].xml"))?;

        tracing::debug!(
            parts = parts.len(),
            relationship_sources = relationships.len(),
            "opened package"
        );

        Ok(Self {
            parts,
            content_types,
            relationships,
        })
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buffer);
        let options: zip::write::FileOptions<'_, ()> =
            zip::write::FileOptions::default().compression_method(CompressionMethod::Deflated);

        writer.start_file(CONTENT_TYPES_PART, options)?;
        writer.write_all(&self.content_types.to_xml()?)?;

        if let Some(root_rels) = self.relationships.get("") {
            writer.start_file(rels_part_name(""), options)?;
            writer.write_all(&relationships_to_xml(root_rels)?)?;
        }

        for (path, content) in &self.parts {
            writer.start_file(path.as_str(), options)?;
            writer.write_all(content)?;

            if let Some(rels) = self.relationships.get(path) {
                if !rels.is_empty() {
                    writer.start_file(rels_part_name(path), options)?;
                    writer.write_all(&relationships_to_xml(rels)?)?;
                }
            }
        }

        writer.finish()?;
        Ok(buffer.into_inner())
    }

    pub fn contains_part(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(|v| v.as_slice())
    }

    pub fn get_xml_part(&self, path: &str) -> Result<XmlDocument> {
        let bytes = self
            .get_part(path)
            .ok_or_else(|| SlideforgeError::missing_part(path))?;
        crate::xml::parser::parse_bytes(bytes)
    }

    pub fn set_part(&mut self, path: &str, content: Vec<u8>) {
        self.parts.insert(path.to_string(), content);
    }

    pub fn put_xml_part(&mut self, path: &str, doc: &XmlDocument) -> Result<()> {
        let bytes = crate::xml::builder::serialize_bytes(doc)?;
        self.set_part(path, bytes);
        Ok(())
    }

    /// Remove a part along with its own relationships and content-type override.
    pub fn delete_part(&mut self, path: &str) {
        self.parts.shift_remove(path);
        self.relationships.shift_remove(path);
        self.content_types.remove_override(path);
    }

    pub fn part_names(&self) -> impl Iterator<Item = &String> {
        self.parts.keys()
    }

    /// First unused name of the form `{prefix}{n}.{extension}`, counting from 1.
    pub fn next_part_name(&self, prefix: &str, extension: &str) -> String {
        (1..)
            .map(|n| format!("{}{}.{}", prefix, n, extension))
            .find(|name| !self.parts.contains_key(name))
            .unwrap_or_default()
    }

    pub fn relationships(&self, source: &str) -> &[Relationship] {
        self.relationships
            .get(source)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn find_relationship(&self, source: &str, id: &str) -> Option<&Relationship> {
        self.relationships(source).iter().find(|r| r.id == id)
    }

    /// Part name an internal relationship points at.
    pub fn resolve_target(&self, source: &str, rel: &Relationship) -> Option<String> {
        if rel.is_external() {
            return None;
        }
        Some(resolve_relative(source, &rel.target))
    }

    pub fn resolve_relationship_id(&self, source: &str, id: &str) -> Option<String> {
        let rel = self.find_relationship(source, id)?;
        self.resolve_target(source, rel)
    }

    /// Resolved target of the first relationship of `rel_type` from `source`.
    pub fn first_target_of_type(&self, source: &str, rel_type: &str) -> Option<String> {
        self.relationships(source)
            .iter()
            .find(|r| r.rel_type == rel_type)
            .and_then(|r| self.resolve_target(source, r))
    }

    pub fn targets_of_type(&self, source: &str, rel_type: &str) -> Vec<String> {
        self.relationships(source)
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .filter_map(|r| self.resolve_target(source, r))
            .collect()
    }

    fn next_relationship_id(&self, source: &str) -> String {
        let rels = self.relationships(source);
        let mut next = rels.iter().filter_map(Relationship::numeric_id).max().unwrap_or(0) + 1;
        while rels.iter().any(|r| r.id == format!("rId{}", next)) {
            next += 1;
        }
        format!("rId{}", next)
    }

    /// Add an internal relationship from `source` to the part `target_part`
    /// and return its fresh id.
    pub fn add_relationship(&mut self, source: &str, rel_type: &str, target_part: &str) -> String {
        let id = self.next_relationship_id(source);
        let target = relative_target(source, target_part);
        self.relationships
            .entry(source.to_string())
            .or_default()
            .push(Relationship::new(&id, rel_type, &target));
        id
    }

    pub fn add_external_relationship(&mut self, source: &str, rel_type: &str, target: &str) -> String {
        let id = self.next_relationship_id(source);
        self.relationships
            .entry(source.to_string())
            .or_default()
            .push(Relationship::external(&id, rel_type, target));
        id
    }

    pub fn remove_relationship(&mut self, source: &str, id: &str) -> Option<Relationship> {
        let rels = self.relationships.get_mut(source)?;
        let index = rels.iter().position(|r| r.id == id)?;
        Some(rels.remove(index))
    }

    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        self.content_types.get_content_type(path)
    }

    pub fn set_content_type(&mut self, path: &str, content_type: &str) {
        self.content_types.set_override(path, content_type);
    }

    pub fn ensure_default_content_type(&mut self, extension: &str, content_type: &str) {
        if !self.content_types.has_default(extension) {
            self.content_types.add_default(extension, content_type);
        }
    }

    /// Delete every part that cannot be reached from the package root through
    /// internal relationships. Returns the deleted part names.
    pub fn prune_unreachable_parts(&mut self) -> Vec<String> {
        let mut reachable: IndexSet<String> = IndexSet::new();
        let mut queue: VecDeque<String> = VecDeque::from([String::new()]);

        while let Some(source) = queue.pop_front() {
            for rel in self.relationships(&source) {
                let Some(target) = self.resolve_target(&source, rel) else {
                    continue;
                };
                if self.parts.contains_key(&target) && reachable.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }

        let unreachable: Vec<String> = self
            .parts
            .keys()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect();
        for name in &unreachable {
            tracing::debug!(part = %name, "pruning unreachable part");
            self.delete_part(name);
        }
        // Relationship sets whose owner is gone would be written nowhere.
        self.relationships
            .retain(|source, _| source.is_empty() || reachable.contains(source));
        unreachable
    }

    /// Relationships from `source` whose internal target part does not exist.
    pub fn dangling_relationships(&self, source: &str) -> Vec<&Relationship> {
        self.relationships(source)
            .iter()
            .filter(|r| {
                self.resolve_target(source, r)
                    .map(|target| !self.parts.contains_key(&target))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Extract core document properties from docProps/core.xml
    pub fn get_core_properties(&self) -> CoreProperties {
        let Ok(core_xml) = self.get_xml_part(CORE_PROPERTIES_PART) else {
            return CoreProperties::default();
        };
        let Some(root) = core_xml.root() else {
            return CoreProperties::default();
        };

        let element_text = |name: XName| -> Option<String> {
            let node = core_xml.find_child(root, &name)?;
            let text = core_xml.text(node);
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        CoreProperties {
            last_modified_by: element_text(CP::lastModifiedBy()),
            creator: element_text(DC::creator()),
            modified: element_text(DCTERMS::modified()),
        }
    }

    /// Record a modification in docProps/core.xml, when the package has one.
    pub fn stamp_core_properties(
        &mut self,
        modified_by: Option<&str>,
        modified: DateTime<Utc>,
    ) -> Result<()> {
        if !self.contains_part(CORE_PROPERTIES_PART) {
            return Ok(());
        }
        let mut doc = self.get_xml_part(CORE_PROPERTIES_PART)?;
        let Some(root) = doc.root() else {
            return Ok(());
        };

        let stamp = modified.to_rfc3339_opts(SecondsFormat::Secs, true);
        let modified_node = match doc.find_child(root, &DCTERMS::modified()) {
            Some(node) => node,
            None => doc.add_child(
                root,
                XmlNodeData::element_with_attrs(
                    DCTERMS::modified(),
                    vec![XAttribute::new(XSI::type_(), "dcterms:W3CDTF")],
                ),
            ),
        };
        replace_text(&mut doc, modified_node, &stamp);

        if let Some(author) = modified_by {
            let node = doc.ensure_child(root, &CP::lastModifiedBy());
            replace_text(&mut doc, node, author);
        }

        if let Some(node) = doc.find_child(root, &CP::revision()) {
            if let Ok(revision) = doc.text(node).trim().parse::<u64>() {
                replace_text(&mut doc, node, &(revision + 1).to_string());
            }
        }

        self.put_xml_part(CORE_PROPERTIES_PART, &doc)
    }
}

impl Default for OoxmlPackage {
    fn default() -> Self {
        Self::new()
    }
}

fn replace_text(doc: &mut XmlDocument, node: indextree::NodeId, text: &str) {
    doc.clear_children(node);
    doc.add_child(node, XmlNodeData::text(text));
}
