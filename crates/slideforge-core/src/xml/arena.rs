use super::node::{XmlFragment, XmlNodeData};
use super::xname::{XAttribute, XName};
use indextree::{Arena, NodeId};

#[derive(Debug)]
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Build a standalone document whose root is a copy of `fragment`.
    pub fn from_fragment(fragment: &XmlFragment) -> Self {
        let mut doc = Self::new();
        let root = doc.add_root(fragment.data.clone());
        for child in &fragment.children {
            doc.append_fragment(root, child);
        }
        doc
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        self.arena.get_mut(id).map(|node| node.get_mut())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    pub fn add_first_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.prepend(child, &mut self.arena);
        child
    }

    pub fn add_before(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_before(new_node, &mut self.arena);
        new_node
    }

    pub fn add_after(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_after(new_node, &mut self.arena);
        new_node
    }

    /// Remove a node together with its whole subtree.
    pub fn remove(&mut self, node: NodeId) {
        node.remove_subtree(&mut self.arena);
        if self.root == Some(node) {
            self.root = None;
        }
    }

    /// Remove every child of `parent`, leaving the element itself in place.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children: Vec<_> = self.children(parent).collect();
        for child in children {
            self.remove(child);
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &XName, value: &str) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                if let Some(attr) = attrs.iter_mut().find(|a| &a.name == name) {
                    attr.value = value.to_string();
                } else {
                    attrs.push(XAttribute::new(name.clone(), value));
                }
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &XName) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                attrs.retain(|a| &a.name != name);
            }
        }
    }

    pub fn name(&self, node: NodeId) -> Option<&XName> {
        self.get(node).and_then(|data| data.name())
    }

    pub fn is_named(&self, node: NodeId, name: &XName) -> bool {
        self.name(node) == Some(name)
    }

    pub fn attribute(&self, node: NodeId, name: &XName) -> Option<&str> {
        self.get(node).and_then(|data| data.attribute(name))
    }

    /// Attribute without a namespace, the common case for OOXML attributes.
    pub fn attr(&self, node: NodeId, local_name: &str) -> Option<&str> {
        self.get(node)?
            .attributes()?
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    pub fn attr_i64(&self, node: NodeId, local_name: &str) -> Option<i64> {
        self.attr(node, local_name)?.trim().parse().ok()
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    /// Element children only, skipping text, comments and processing instructions.
    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&id| self.get(id).map(|d| d.is_element()).unwrap_or(false))
    }

    /// Descendants in document order, starting with `node` itself.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena)
    }

    pub fn elements_by_name<'a>(
        &'a self,
        parent: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .filter(move |&child_id| self.is_named(child_id, name))
    }

    pub fn find_child(&self, parent: NodeId, name: &XName) -> Option<NodeId> {
        self.elements_by_name(parent, name).next()
    }

    /// First descendant (excluding `node`) with the given name.
    pub fn find_descendant(&self, node: NodeId, name: &XName) -> Option<NodeId> {
        self.descendants(node)
            .skip(1)
            .find(|&id| self.is_named(id, name))
    }

    /// Walk a chain of child names from `start`.
    pub fn find_path(&self, start: NodeId, path: &[XName]) -> Option<NodeId> {
        path.iter()
            .try_fold(start, |current, name| self.find_child(current, name))
    }

    pub fn ensure_child(&mut self, parent: NodeId, name: &XName) -> NodeId {
        match self.find_child(parent, name) {
            Some(existing) => existing,
            None => self.add_child(parent, XmlNodeData::element(name.clone())),
        }
    }

    /// Concatenated text of every text node below `node`.
    pub fn text(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter_map(|id| self.get(id).and_then(|d| d.text_content()))
            .collect()
    }

    /// Owned copy of the subtree rooted at `node`.
    pub fn fragment(&self, node: NodeId) -> Option<XmlFragment> {
        let data = self.get(node)?.clone();
        let children = self
            .children(node)
            .filter_map(|child| self.fragment(child))
            .collect();
        Some(XmlFragment { data, children })
    }

    /// Append a fresh copy of `fragment` as the last child of `parent`.
    pub fn append_fragment(&mut self, parent: NodeId, fragment: &XmlFragment) -> NodeId {
        let id = self.add_child(parent, fragment.data.clone());
        for child in &fragment.children {
            self.append_fragment(id, child);
        }
        id
    }

    /// Insert a fresh copy of `fragment` immediately before `sibling`.
    pub fn insert_fragment_before(&mut self, sibling: NodeId, fragment: &XmlFragment) -> NodeId {
        let id = self.add_before(sibling, fragment.data.clone());
        for child in &fragment.children {
            self.append_fragment(id, child);
        }
        id
    }

    /// Namespace declarations visible at `node`, nearest declaration first.
    pub fn namespaces_in_scope(&self, node: NodeId) -> Vec<XAttribute> {
        let mut seen: Vec<XAttribute> = Vec::new();
        for ancestor in self.ancestors(node) {
            let Some(attrs) = self.get(ancestor).and_then(|d| d.attributes()) else {
                continue;
            };
            for attr in attrs.iter().filter(|a| a.is_namespace_declaration()) {
                if !seen.iter().any(|s| s.name == attr.name) {
                    seen.push(attr.clone());
                }
            }
        }
        seen
    }

    /// Declare a namespace on `node` unless the same prefix is already in scope.
    pub fn declare_namespace(&mut self, node: NodeId, declaration: &XAttribute) {
        let in_scope = self.namespaces_in_scope(node);
        if in_scope.iter().any(|d| d.name == declaration.name) {
            return;
        }
        if let Some(attrs) = self.get_mut(node).and_then(|d| d.attributes_mut()) {
            attrs.push(declaration.clone());
        }
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
