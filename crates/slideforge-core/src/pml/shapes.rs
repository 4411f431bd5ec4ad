use crate::xml::namespaces::{A, P};
use crate::xml::{XName, XmlDocument};
use indextree::NodeId;
use serde::{Deserialize, Serialize};

/// English Metric Units; 914400 per inch.
pub type Emu = i64;

pub const EMU_PER_INCH: Emu = 914_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Geometry {
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Read `a:off`/`a:ext` from an `a:xfrm` (or `p:xfrm`) element.
    pub fn from_xfrm(doc: &XmlDocument, xfrm: NodeId) -> Option<Self> {
        let off = doc.find_child(xfrm, &A::off())?;
        let ext = doc.find_child(xfrm, &A::ext())?;
        Some(Self {
            left: doc.attr_i64(off, "x")?,
            top: doc.attr_i64(off, "y")?,
            width: doc.attr_i64(ext, "cx")?,
            height: doc.attr_i64(ext, "cy")?,
        })
    }
}

/// Semantic role of a placeholder, the only key used to route content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceholderRole {
    Title,
    CenterTitle,
    Body,
    Object,
    Picture,
    Other,
    NotPlaceholder,
}

impl PlaceholderRole {
    /// Role for the `type` attribute of `p:ph`; an absent type means `obj`.
    pub fn from_ph_type(ph_type: Option<&str>) -> Self {
        match ph_type.unwrap_or("obj") {
            "title" => Self::Title,
            "ctrTitle" => Self::CenterTitle,
            "body" => Self::Body,
            "obj" => Self::Object,
            "pic" => Self::Picture,
            _ => Self::Other,
        }
    }

    pub fn is_title(self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    pub fn is_body(self) -> bool {
        matches!(self, Self::Body | Self::Object)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Shape,
    Picture,
    Group,
    GraphicFrame,
    Connector,
    ContentPart,
}

impl ShapeKind {
    fn of(name: &XName) -> Option<Self> {
        if !name.in_namespace(P::NS) {
            return None;
        }
        let kind = match name.local_name.as_str() {
            "sp" => Self::Shape,
            "pic" => Self::Picture,
            "grpSp" => Self::Group,
            "graphicFrame" => Self::GraphicFrame,
            "cxnSp" => Self::Connector,
            "contentPart" => Self::ContentPart,
            _ => return None,
        };
        Some(kind)
    }

    fn non_visual_name(self) -> Option<XName> {
        match self {
            Self::Shape => Some(P::nvSpPr()),
            Self::Picture => Some(P::nvPicPr()),
            Self::Group => Some(P::nvGrpSpPr()),
            Self::GraphicFrame => Some(P::nvGraphicFramePr()),
            Self::Connector => Some(P::nvCxnSpPr()),
            Self::ContentPart => None,
        }
    }
}

/// Placeholder descriptor as found on a slide or layout shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    pub role: PlaceholderRole,
    /// Raw `type` attribute, `None` when absent.
    pub ph_type: Option<String>,
    pub idx: Option<u32>,
    pub name: String,
    pub geometry: Option<Geometry>,
}

/// `p:cSld/p:spTree` of a slide, layout, master or notes part.
pub fn sp_tree(doc: &XmlDocument) -> Option<NodeId> {
    let root = doc.root()?;
    doc.find_path(root, &[P::cSld(), P::spTree()])
}

/// Top-level shapes of a shape tree in z-order.
pub fn shape_nodes(doc: &XmlDocument, sp_tree: NodeId) -> Vec<NodeId> {
    doc.element_children(sp_tree)
        .filter(|&node| shape_kind(doc, node).is_some() || is_alternate_content(doc, node))
        .collect()
}

fn is_alternate_content(doc: &XmlDocument, node: NodeId) -> bool {
    doc.name(node)
        .map(|n| n.local_name == "AlternateContent")
        .unwrap_or(false)
}

pub fn shape_kind(doc: &XmlDocument, node: NodeId) -> Option<ShapeKind> {
    doc.name(node).and_then(ShapeKind::of)
}

/// The `p:nvXxPr` element of a shape.
pub fn non_visual_props(doc: &XmlDocument, shape: NodeId) -> Option<NodeId> {
    let name = shape_kind(doc, shape)?.non_visual_name()?;
    doc.find_child(shape, &name)
}

/// `p:cNvPr` of a shape, holding its id and name.
pub fn c_nv_pr(doc: &XmlDocument, shape: NodeId) -> Option<NodeId> {
    doc.find_child(non_visual_props(doc, shape)?, &P::cNvPr())
}

pub fn placeholder_element(doc: &XmlDocument, shape: NodeId) -> Option<NodeId> {
    doc.find_path(non_visual_props(doc, shape)?, &[P::nvPr(), P::ph()])
}

pub fn placeholder_role(doc: &XmlDocument, shape: NodeId) -> PlaceholderRole {
    match placeholder_element(doc, shape) {
        Some(ph) => PlaceholderRole::from_ph_type(doc.attr(ph, "type")),
        None => PlaceholderRole::NotPlaceholder,
    }
}

pub fn placeholder_info(doc: &XmlDocument, shape: NodeId) -> Option<PlaceholderInfo> {
    let ph = placeholder_element(doc, shape)?;
    let ph_type = doc.attr(ph, "type").map(str::to_string);
    Some(PlaceholderInfo {
        role: PlaceholderRole::from_ph_type(ph_type.as_deref()),
        idx: doc.attr(ph, "idx").and_then(|v| v.parse().ok()),
        ph_type,
        name: shape_name(doc, shape).unwrap_or_default(),
        geometry: shape_geometry(doc, shape),
    })
}

pub fn shape_name(doc: &XmlDocument, shape: NodeId) -> Option<String> {
    c_nv_pr(doc, shape).and_then(|n| doc.attr(n, "name").map(str::to_string))
}

/// Geometry stated on the shape itself; placeholders often leave it to the layout.
pub fn shape_geometry(doc: &XmlDocument, shape: NodeId) -> Option<Geometry> {
    let xfrm = match shape_kind(doc, shape)? {
        ShapeKind::Shape | ShapeKind::Picture | ShapeKind::Connector => {
            doc.find_path(shape, &[P::spPr(), A::xfrm()])
        }
        ShapeKind::Group => doc.find_path(shape, &[P::grpSpPr(), A::xfrm()]),
        ShapeKind::GraphicFrame => doc.find_child(shape, &P::xfrm()),
        ShapeKind::ContentPart => None,
    }?;
    Geometry::from_xfrm(doc, xfrm)
}

/// Find the layout placeholder a slide placeholder inherits from: same `idx`
/// first, then same type.
pub fn matching_placeholder(
    layout: &XmlDocument,
    ph_type: Option<&str>,
    idx: Option<u32>,
) -> Option<NodeId> {
    let tree = sp_tree(layout)?;
    let placeholders: Vec<(NodeId, Option<String>, Option<u32>)> = shape_nodes(layout, tree)
        .into_iter()
        .filter_map(|shape| {
            let ph = placeholder_element(layout, shape)?;
            Some((
                shape,
                layout.attr(ph, "type").map(str::to_string),
                layout.attr(ph, "idx").and_then(|v| v.parse().ok()),
            ))
        })
        .collect();

    let wanted_type = ph_type.unwrap_or("obj");
    let by_idx = idx.and_then(|idx| {
        placeholders
            .iter()
            .find(|(_, _, candidate)| *candidate == Some(idx))
    });
    let by_type = || {
        placeholders
            .iter()
            .find(|(_, candidate, _)| candidate.as_deref().unwrap_or("obj") == wanted_type)
    };
    by_idx.or_else(by_type).map(|(shape, _, _)| *shape)
}

/// Next free `cNvPr` id in a part; ids are unique per slide.
pub fn next_shape_id(doc: &XmlDocument) -> u32 {
    let Some(root) = doc.root() else {
        return 1;
    };
    doc.descendants(root)
        .filter(|&node| doc.is_named(node, &P::cNvPr()))
        .filter_map(|node| doc.attr(node, "id").and_then(|v| v.parse::<u32>().ok()))
        .max()
        .unwrap_or(0)
        + 1
}
