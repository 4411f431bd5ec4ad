use super::arena::XmlDocument;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName, XMLNS_NS};
use crate::error::{Result, SlideforgeError};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::io::Cursor;

/// Maps namespace URI to the prefix bound to it in the current scope.
type NamespaceMap = HashMap<String, String>;

pub fn serialize(doc: &XmlDocument) -> Result<String> {
    let bytes = serialize_bytes(doc)?;
    String::from_utf8(bytes).map_err(|e| SlideforgeError::XmlWrite(e.to_string()))
}

/// Serialize with the standalone declaration OOXML parts carry.
pub fn serialize_bytes(doc: &XmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_error)?;

    if let Some(root_id) = doc.root() {
        write_node(doc, root_id, &mut writer, &NamespaceMap::new())?;
    }

    Ok(writer.into_inner().into_inner())
}

fn write_error(e: impl std::fmt::Display) -> SlideforgeError {
    SlideforgeError::XmlWrite(e.to_string())
}

fn extend_namespace_map(namespace_map: &mut NamespaceMap, attributes: &[XAttribute]) {
    for attr in attributes {
        if attr.name.namespace.is_none() && attr.name.local_name == "xmlns" {
            namespace_map.insert(attr.value.clone(), String::new());
        } else if attr.name.in_namespace(XMLNS_NS) {
            namespace_map.insert(attr.value.clone(), attr.name.local_name.clone());
        }
    }
}

fn qualified(prefix: &str, local_name: &str) -> String {
    if prefix.is_empty() {
        local_name.to_string()
    } else {
        format!("{}:{}", prefix, local_name)
    }
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element(doc, node_id, name, attributes, writer, namespace_map)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::CData(text) => {
            writer
                .write_event(Event::CData(BytesCData::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(&content)))
                .map_err(write_error)?;
        }
    }

    Ok(())
}

fn write_element<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let mut scoped_map = namespace_map.clone();
    extend_namespace_map(&mut scoped_map, attributes);

    // Elements built in code may use a namespace nobody declared yet; bind
    // it here with its conventional prefix.
    let mut implied: Vec<(String, String)> = Vec::new();
    let mut bind = |ns: &str, for_attribute: bool, map: &mut NamespaceMap| -> String {
        if ns == XMLNS_NS {
            return "xmlns".to_string();
        }
        if ns == XML_NS {
            return "xml".to_string();
        }
        match map.get(ns) {
            Some(prefix) if !(for_attribute && prefix.is_empty()) => prefix.clone(),
            _ => {
                let prefix = get_prefix(ns).to_string();
                map.insert(ns.to_string(), prefix.clone());
                implied.push((prefix.clone(), ns.to_string()));
                prefix
            }
        }
    };

    let tag_name = match &name.namespace {
        Some(ns) => qualified(&bind(ns, false, &mut scoped_map), &name.local_name),
        None => name.local_name.clone(),
    };

    let mut attr_names = Vec::with_capacity(attributes.len());
    for attr in attributes {
        let attr_name = match &attr.name.namespace {
            Some(ns) => qualified(&bind(ns, true, &mut scoped_map), &attr.name.local_name),
            None => attr.name.local_name.clone(),
        };
        attr_names.push(attr_name);
    }

    let mut elem = BytesStart::new(tag_name.as_str());
    for (attr_name, attr) in attr_names.iter().zip(attributes) {
        elem.push_attribute((attr_name.as_str(), attr.value.as_str()));
    }
    for (prefix, uri) in &implied {
        let decl = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{}", prefix)
        };
        elem.push_attribute((decl.as_str(), uri.as_str()));
    }

    let children: Vec<_> = doc.children(node_id).collect();

    if children.is_empty() {
        writer.write_event(Event::Empty(elem)).map_err(write_error)?;
    } else {
        writer.write_event(Event::Start(elem)).map_err(write_error)?;

        for child_id in children {
            write_node(doc, child_id, writer, &scoped_map)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
            .map_err(write_error)?;
    }

    Ok(())
}

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

fn get_prefix(namespace: &str) -> &'static str {
    match namespace {
        "http://schemas.openxmlformats.org/presentationml/2006/main" => "p",
        "http://schemas.openxmlformats.org/drawingml/2006/main" => "a",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships" => "r",
        "http://schemas.openxmlformats.org/markup-compatibility/2006" => "mc",
        "http://schemas.microsoft.com/office/powerpoint/2010/main" => "p14",
        "http://schemas.microsoft.com/office/drawing/2010/main" => "a14",
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties" => "cp",
        "http://purl.org/dc/elements/1.1/" => "dc",
        "http://purl.org/dc/terms/" => "dcterms",
        "http://www.w3.org/2001/XMLSchema-instance" => "xsi",
        "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes" => "vt",
        // Package parts conventionally use an unprefixed default namespace.
        "http://schemas.openxmlformats.org/package/2006/relationships" => "",
        "http://schemas.openxmlformats.org/package/2006/content-types" => "",
        "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" => "",
        _ => "ns",
    }
}
