use super::arena::XmlDocument;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{Result, SlideforgeError};

pub fn parse(xml: &str) -> Result<XmlDocument> {
    parse_bytes(xml.as_bytes())
}

pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| SlideforgeError::XmlParse {
        message: e.to_string(),
        location: "input".to_string(),
    })?;
    // Some producers emit a byte order mark in front of the declaration.
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

    let doc = roxmltree::Document::parse_with_options(
        text,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| SlideforgeError::XmlParse {
        message: e.to_string(),
        location: format!("line {}", e.pos().row),
    })?;

    let mut xml_doc = XmlDocument::new();
    build_tree(doc.root_element(), &mut xml_doc, None);
    Ok(xml_doc)
}

fn build_tree(node: roxmltree::Node, doc: &mut XmlDocument, parent: Option<indextree::NodeId>) {
    let node_data = match node.node_type() {
        roxmltree::NodeType::Element => {
            let name = XName::new(
                node.tag_name().namespace().unwrap_or(""),
                node.tag_name().name(),
            );

            let mut attributes: Vec<XAttribute> = node
                .attributes()
                .map(|attr| {
                    XAttribute::new(
                        XName::new(attr.namespace().unwrap_or(""), attr.name()),
                        attr.value(),
                    )
                })
                .collect();

            // roxmltree reports every namespace in scope; keep only the ones
            // this element introduces so serialization does not repeat them.
            let inherited: Vec<(Option<&str>, &str)> = node
                .parent_element()
                .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
                .unwrap_or_default();

            for ns in node.namespaces() {
                if ns.name() == Some("xml") || inherited.contains(&(ns.name(), ns.uri())) {
                    continue;
                }
                attributes.push(XAttribute::xmlns(ns.name().unwrap_or(""), ns.uri()));
            }

            XmlNodeData::Element { name, attributes }
        }
        roxmltree::NodeType::Text => match node.text() {
            Some(text) => XmlNodeData::Text(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::Comment => match node.text() {
            Some(text) => XmlNodeData::Comment(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::PI => XmlNodeData::ProcessingInstruction {
            target: node.pi().map(|pi| pi.target.to_string()).unwrap_or_default(),
            data: node
                .pi()
                .and_then(|pi| pi.value.map(|s| s.to_string()))
                .unwrap_or_default(),
        },
        _ => return,
    };

    let new_id = match parent {
        Some(parent_id) => doc.add_child(parent_id, node_data),
        None => doc.add_root(node_data),
    };

    for child in node.children() {
        build_tree(child, doc, Some(new_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_xml() {
        let xml = r#"<root><child attr="value">text</child></root>"#;
        let doc = parse(xml).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.text(root), "text");
    }

    #[test]
    fn parse_rejects_malformed_xml() {
        let err = parse("<p:sld><unclosed></p:sld>").unwrap_err();
        assert!(matches!(err, SlideforgeError::XmlParse { .. }));
    }

    #[test]
    fn namespace_declarations_stay_on_declaring_element() {
        let xml = r#"<p:sld xmlns:p="urn:p" xmlns:a="urn:a"><p:cSld><a:t>x</a:t></p:cSld></p:sld>"#;
        let doc = parse(xml).unwrap();
        let root = doc.root().unwrap();

        let root_decls = doc
            .get(root)
            .and_then(|d| d.attributes())
            .map(|attrs| attrs.iter().filter(|a| a.is_namespace_declaration()).count())
            .unwrap_or(0);
        assert_eq!(root_decls, 2);

        let c_sld = doc.find_child(root, &XName::new("urn:p", "cSld")).unwrap();
        let c_sld_attrs = doc.get(c_sld).and_then(|d| d.attributes()).unwrap();
        assert!(c_sld_attrs.is_empty());
    }

    #[test]
    fn parse_preserves_attribute_order() {
        let xml = r#"<root a="1" b="2" c="3" d="4"/>"#;
        let doc = parse(xml).unwrap();

        let root_id = doc.root().unwrap();
        let attrs = doc.get(root_id).unwrap().attributes().unwrap();

        let names: Vec<_> = attrs.iter().map(|a| a.name.local_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn parse_accepts_byte_order_mark() {
        let doc = parse_bytes("\u{FEFF}<root/>".as_bytes()).unwrap();
        assert!(doc.root().is_some());
    }
}
