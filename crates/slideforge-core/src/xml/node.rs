use super::xname::{XAttribute, XName};

#[derive(Clone, Debug, PartialEq)]
pub enum XmlNodeData {
    Element {
        name: XName,
        attributes: Vec<XAttribute>,
    },
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl XmlNodeData {
    pub fn element(name: XName) -> Self {
        Self::Element {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn element_with_attrs(name: XName, attributes: Vec<XAttribute>) -> Self {
        Self::Element { name, attributes }
    }

    pub fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn name(&self) -> Option<&XName> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self) -> Option<&[XAttribute]> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut Vec<XAttribute>> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &XName) -> Option<&str> {
        self.attributes()?
            .iter()
            .find(|a| &a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::CData(s) => Some(s),
            _ => None,
        }
    }
}

/// An owned, arena-independent copy of a subtree.
///
/// Fragments are the unit of structural copying between documents: taking a
/// fragment clones every node value, so the copy never aliases its source.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlFragment {
    pub data: XmlNodeData,
    pub children: Vec<XmlFragment>,
}

impl XmlFragment {
    pub fn new(data: XmlNodeData) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: XmlFragment) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> Option<&XName> {
        self.data.name()
    }

    /// Visit every node of the fragment, parents before children.
    pub fn walk_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut XmlNodeData),
    {
        f(&mut self.data);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(XmlFragment::node_count).sum::<usize>()
    }
}
