use crate::xml::namespaces::{A, P};
use crate::xml::{XmlDocument, XmlFragment, XmlNodeData};
use indextree::NodeId;

/// `p:txBody` of a shape.
pub fn tx_body(doc: &XmlDocument, shape: NodeId) -> Option<NodeId> {
    doc.find_child(shape, &P::txBody())
}

/// Return the shape's `p:txBody`, creating a minimal one when absent.
pub fn ensure_tx_body(doc: &mut XmlDocument, shape: NodeId) -> NodeId {
    if let Some(body) = tx_body(doc, shape) {
        return body;
    }
    let body = match doc.find_child(shape, &P::extLst()) {
        Some(ext) => doc.add_before(ext, XmlNodeData::element(P::txBody())),
        None => doc.add_child(shape, XmlNodeData::element(P::txBody())),
    };
    doc.add_child(body, XmlNodeData::element(A::bodyPr()));
    doc.add_child(body, XmlNodeData::element(A::lstStyle()));
    doc.add_child(body, XmlNodeData::element(A::p()));
    body
}

pub fn paragraphs(doc: &XmlDocument, tx_body: NodeId) -> Vec<NodeId> {
    doc.elements_by_name(tx_body, &A::p()).collect()
}

/// Text of a paragraph; line breaks become `\n`.
pub fn paragraph_text(doc: &XmlDocument, paragraph: NodeId) -> String {
    let mut text = String::new();
    for child in doc.element_children(paragraph) {
        if doc.is_named(child, &A::br()) {
            text.push('\n');
        } else if doc.is_named(child, &A::r()) || doc.is_named(child, &A::fld()) {
            if let Some(t) = doc.find_child(child, &A::t()) {
                text.push_str(&doc.text(t));
            }
        }
    }
    text
}

/// Paragraph texts of a shape's text body, in order.
pub fn shape_paragraph_texts(doc: &XmlDocument, shape: NodeId) -> Vec<String> {
    tx_body(doc, shape)
        .map(|body| {
            paragraphs(doc, body)
                .into_iter()
                .map(|p| paragraph_text(doc, p))
                .collect()
        })
        .unwrap_or_default()
}

pub fn shape_text(doc: &XmlDocument, shape: NodeId) -> String {
    shape_paragraph_texts(doc, shape).join("\n")
}

/// Formatting lifted from an existing paragraph so new text looks the same.
#[derive(Debug, Clone, Default)]
pub struct ParagraphStyle {
    paragraph_props: Option<XmlFragment>,
    run_props: Option<XmlFragment>,
}

impl ParagraphStyle {
    /// Capture `a:pPr` and the first run's `a:rPr` (or `a:endParaRPr`) of `paragraph`.
    pub fn capture(doc: &XmlDocument, paragraph: NodeId) -> Self {
        let paragraph_props = doc
            .find_child(paragraph, &A::pPr())
            .and_then(|node| doc.fragment(node));
        let run_props = doc
            .find_child(paragraph, &A::r())
            .and_then(|run| doc.find_child(run, &A::rPr()))
            .or_else(|| doc.find_child(paragraph, &A::endParaRPr()))
            .and_then(|node| doc.fragment(node))
            .map(|mut fragment| {
                // endParaRPr carries the same attributes under another name.
                fragment.data = match fragment.data {
                    XmlNodeData::Element { attributes, .. } => {
                        XmlNodeData::element_with_attrs(A::rPr(), attributes)
                    }
                    other => other,
                };
                fragment
            });
        Self {
            paragraph_props,
            run_props,
        }
    }

    /// Same formatting with the indent level reset to 0.
    pub fn at_level_zero(mut self) -> Self {
        if let Some(props) = self.paragraph_props.as_mut() {
            if let Some(attrs) = props.data.attributes_mut() {
                attrs.retain(|a| !(a.name.namespace.is_none() && a.name.local_name == "lvl"));
            }
        }
        self
    }
}

/// Append a single-run paragraph holding `text` to a text body.
pub fn append_paragraph(
    doc: &mut XmlDocument,
    tx_body: NodeId,
    text: &str,
    style: &ParagraphStyle,
) -> NodeId {
    let paragraph = doc.add_child(tx_body, XmlNodeData::element(A::p()));
    if let Some(props) = &style.paragraph_props {
        doc.append_fragment(paragraph, props);
    }
    append_run(doc, paragraph, text, style);
    paragraph
}

fn append_run(doc: &mut XmlDocument, paragraph: NodeId, text: &str, style: &ParagraphStyle) {
    let run = doc.add_child(paragraph, XmlNodeData::element(A::r()));
    if let Some(props) = &style.run_props {
        doc.append_fragment(run, props);
    }
    let t = doc.add_child(run, XmlNodeData::element(A::t()));
    if !text.is_empty() {
        doc.add_child(t, XmlNodeData::text(text));
    }
}

/// Replace the text of `paragraph`, keeping its paragraph properties and the
/// formatting of its first run.
pub fn set_paragraph_text(doc: &mut XmlDocument, paragraph: NodeId, text: &str) {
    let style = ParagraphStyle::capture(doc, paragraph);
    let end_props = doc.find_child(paragraph, &A::endParaRPr());

    let content: Vec<NodeId> = doc
        .element_children(paragraph)
        .filter(|&n| !doc.is_named(n, &A::pPr()) && Some(n) != end_props)
        .collect();
    for node in content {
        doc.remove(node);
    }

    append_run(doc, paragraph, text, &style);
    if let Some(end) = end_props {
        // a:endParaRPr must stay the last child
        if let Some(fragment) = doc.fragment(end) {
            doc.remove(end);
            doc.append_fragment(paragraph, &fragment);
        }
    }
}

/// Remove every paragraph of a text body, keeping `a:bodyPr` and `a:lstStyle`.
pub fn clear_paragraphs(doc: &mut XmlDocument, tx_body: NodeId) {
    for paragraph in paragraphs(doc, tx_body) {
        doc.remove(paragraph);
    }
}

/// Replace the whole text of a shape with one paragraph per line of `text`.
pub fn set_shape_text(doc: &mut XmlDocument, shape: NodeId, text: &str) {
    let body = ensure_tx_body(doc, shape);
    let style = paragraphs(doc, body)
        .first()
        .map(|&p| ParagraphStyle::capture(doc, p))
        .unwrap_or_default();
    clear_paragraphs(doc, body);
    for line in text.split('\n') {
        append_paragraph(doc, body, line, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pml::shapes::{shape_nodes, sp_tree};
    use crate::xml::parser::parse;
    use pretty_assertions::assert_eq;

    const SLIDE: &str = r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>
        <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>
            <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" b="1"/><a:t>Old</a:t></a:r><a:r><a:rPr lang="en-US"/><a:t> title</a:t></a:r><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>
        <p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>
            <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:pPr lvl="1"/><a:r><a:rPr sz="2000"/><a:t>one</a:t></a:r></a:p><a:p><a:r><a:t>two</a:t></a:r><a:br/><a:r><a:t>three</a:t></a:r></a:p></p:txBody></p:sp>
        <p:sp><p:nvSpPr><p:cNvPr id="4" name="Empty"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>
    </p:spTree></p:cSld></p:sld>"#;

    fn shapes(doc: &XmlDocument) -> Vec<NodeId> {
        shape_nodes(doc, sp_tree(doc).unwrap())
    }

    #[test]
    fn paragraph_text_joins_runs_and_breaks() {
        let doc = parse(SLIDE).unwrap();
        let s = shapes(&doc);
        assert_eq!(shape_paragraph_texts(&doc, s[0]), vec!["Old title"]);
        assert_eq!(shape_paragraph_texts(&doc, s[1]), vec!["one", "two\nthree"]);
    }

    #[test]
    fn set_paragraph_text_keeps_first_run_formatting() {
        let mut doc = parse(SLIDE).unwrap();
        let title = shapes(&doc)[0];
        let body = tx_body(&doc, title).unwrap();
        let paragraph = paragraphs(&doc, body)[0];

        set_paragraph_text(&mut doc, paragraph, "Intro");

        assert_eq!(shape_text(&doc, title), "Intro");
        let run = doc.find_child(paragraph, &A::r()).unwrap();
        let rpr = doc.find_child(run, &A::rPr()).unwrap();
        assert_eq!(doc.attr(rpr, "b"), Some("1"));
        assert_eq!(doc.elements_by_name(paragraph, &A::r()).count(), 1);
        assert!(doc.find_child(paragraph, &A::pPr()).is_some());
        // endParaRPr must stay last
        let last = doc.element_children(paragraph).last().unwrap();
        assert!(doc.is_named(last, &A::endParaRPr()));
    }

    #[test]
    fn appended_paragraphs_reset_indent_level() {
        let mut doc = parse(SLIDE).unwrap();
        let shape = shapes(&doc)[1];
        let body = tx_body(&doc, shape).unwrap();
        let style = ParagraphStyle::capture(&doc, paragraphs(&doc, body)[0]).at_level_zero();

        clear_paragraphs(&mut doc, body);
        append_paragraph(&mut doc, body, "Point A", &style);
        append_paragraph(&mut doc, body, "Point B", &style);

        assert_eq!(shape_paragraph_texts(&doc, shape), vec!["Point A", "Point B"]);
        for p in paragraphs(&doc, body) {
            let ppr = doc.find_child(p, &A::pPr()).unwrap();
            assert_eq!(doc.attr(ppr, "lvl"), None);
            let run = doc.find_child(p, &A::r()).unwrap();
            let rpr = doc.find_child(run, &A::rPr()).unwrap();
            assert_eq!(doc.attr(rpr, "sz"), Some("2000"));
        }
    }

    #[test]
    fn set_shape_text_creates_text_body_when_missing() {
        let mut doc = parse(SLIDE).unwrap();
        let shape = shapes(&doc)[2];
        set_shape_text(&mut doc, shape, "first\nsecond");

        assert_eq!(shape_paragraph_texts(&doc, shape), vec!["first", "second"]);
        let body = tx_body(&doc, shape).unwrap();
        assert!(doc.find_child(body, &A::bodyPr()).is_some());
    }
}
