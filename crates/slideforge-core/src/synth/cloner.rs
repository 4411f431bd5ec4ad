use crate::error::{Result, SlideforgeError};
use crate::package::relationships::relationship_types;
use crate::pml::shapes::{shape_nodes, sp_tree};
use crate::pml::{PmlDocument, SlideRef};
use crate::xml::namespaces::{A, MC, P, R};
use crate::xml::{XName, XmlDocument, XmlFragment, XmlNodeData};
use std::collections::HashMap;

/// Relationship id on the source slide mapped to its replacement on the
/// copy; `None` when the reference is dropped.
type RelationshipMap = HashMap<String, Option<String>>;

/// Duplicates template slides onto freshly appended slides.
pub struct SlideCloner;

impl SlideCloner {
    /// Append a slide bound to `source`'s layout whose shape tree is an
    /// independent copy of `source`'s.
    ///
    /// On failure nothing is left behind: a half-built slide is removed again
    /// and [`SlideforgeError::CloneFailed`] is returned.
    pub fn clone_slide(doc: &mut PmlDocument, source: &SlideRef) -> Result<SlideRef> {
        let layout = doc.slide_layout_part(&source.part_name).ok_or_else(|| {
            clone_failed(source, "slide has no layout relationship".to_string())
        })?;
        let source_doc = doc
            .package()
            .get_xml_part(&source.part_name)
            .map_err(|e| clone_failed(source, e.to_string()))?;

        let target = doc
            .add_slide(&layout)
            .map_err(|e| clone_failed(source, e.to_string()))?;

        if let Err(e) = copy_shapes(doc, source, &source_doc, &target) {
            if let Err(rollback) = doc.remove_slide(&target) {
                tracing::warn!(slide = %target.part_name, error = %rollback, "rollback of failed clone incomplete");
            }
            return Err(clone_failed(source, e.to_string()));
        }

        tracing::debug!(source = %source.part_name, target = %target.part_name, "cloned slide");
        Ok(target)
    }
}

fn clone_failed(source: &SlideRef, message: String) -> SlideforgeError {
    SlideforgeError::CloneFailed {
        slide_index: source.index,
        message,
    }
}

fn copy_shapes(
    doc: &mut PmlDocument,
    source: &SlideRef,
    source_doc: &XmlDocument,
    target: &SlideRef,
) -> Result<()> {
    let source_root = source_doc
        .root()
        .ok_or_else(|| SlideforgeError::invalid_package("source slide is empty"))?;
    let source_tree = sp_tree(source_doc)
        .ok_or_else(|| SlideforgeError::invalid_package("source slide has no shape tree"))?;

    let mut fragments: Vec<XmlFragment> = shape_nodes(source_doc, source_tree)
        .into_iter()
        .filter_map(|shape| source_doc.fragment(shape))
        .collect();
    let mut background = source_doc
        .find_path(source_root, &[P::cSld(), P::bg()])
        .and_then(|bg| source_doc.fragment(bg));

    let mut mapping = RelationshipMap::new();
    for fragment in fragments.iter().chain(background.iter()) {
        collect_relationship_ids(fragment, &mut mapping);
    }
    replicate_relationships(doc, &source.part_name, &target.part_name, &mut mapping);

    fragments.retain_mut(|fragment| apply_mapping(fragment, &mapping));
    if let Some(bg) = background.as_mut() {
        apply_mapping(bg, &mapping);
    }

    let mut target_doc = doc.package().get_xml_part(&target.part_name)?;
    let target_root = target_doc
        .root()
        .ok_or_else(|| SlideforgeError::missing_part(&target.part_name))?;
    let target_tree = sp_tree(&target_doc)
        .ok_or_else(|| SlideforgeError::invalid_package("new slide has no shape tree"))?;

    // Copies refer to prefixes the source declared anywhere above its shapes.
    for declaration in source_doc.namespaces_in_scope(source_tree) {
        target_doc.declare_namespace(target_root, &declaration);
    }
    if let Some(ignorable) = source_doc.attribute(source_root, &MC::Ignorable()) {
        if target_doc.attribute(target_root, &MC::Ignorable()).is_none() {
            let ignorable = ignorable.to_string();
            target_doc.set_attribute(target_root, &MC::Ignorable(), &ignorable);
        }
    }

    for default_shape in shape_nodes(&target_doc, target_tree) {
        target_doc.remove(default_shape);
    }
    // p:bg precedes p:spTree inside p:cSld.
    if let Some(bg) = &background {
        target_doc.insert_fragment_before(target_tree, bg);
    }
    let anchor = target_doc.find_child(target_tree, &P::extLst());
    for fragment in &fragments {
        match anchor {
            Some(ext) => target_doc.insert_fragment_before(ext, fragment),
            None => target_doc.append_fragment(target_tree, fragment),
        };
    }

    doc.package_mut().put_xml_part(&target.part_name, &target_doc)
}

fn is_relationship_attribute(name: &XName) -> bool {
    name.in_namespace(R::NS)
}

fn collect_relationship_ids(fragment: &XmlFragment, mapping: &mut RelationshipMap) {
    if let Some(attrs) = fragment.data.attributes() {
        for attr in attrs.iter().filter(|a| is_relationship_attribute(&a.name)) {
            if !attr.value.is_empty() {
                mapping.entry(attr.value.clone()).or_insert(None);
            }
        }
    }
    for child in &fragment.children {
        collect_relationship_ids(child, mapping);
    }
}

/// Give the target slide its own relationship for every id the copies use.
/// Slide-to-slide links and references to missing parts map to `None`.
fn replicate_relationships(
    doc: &mut PmlDocument,
    source_part: &str,
    target_part: &str,
    mapping: &mut RelationshipMap,
) {
    let mut ids: Vec<String> = mapping.keys().cloned().collect();
    ids.sort();

    for id in ids {
        let Some(rel) = doc.package().find_relationship(source_part, &id).cloned() else {
            tracing::debug!(rel_id = %id, "shape references an unknown relationship");
            continue;
        };

        let new_id = if rel.is_external() {
            Some(
                doc.package_mut()
                    .add_external_relationship(target_part, &rel.rel_type, &rel.target),
            )
        } else if rel.rel_type == relationship_types::SLIDE {
            tracing::debug!(rel_id = %id, "dropping link to another slide");
            None
        } else {
            match doc.package().resolve_target(source_part, &rel) {
                Some(part) if doc.package().contains_part(&part) => Some(
                    doc.package_mut()
                        .add_relationship(target_part, &rel.rel_type, &part),
                ),
                _ => None,
            }
        };
        mapping.insert(id, new_id);
    }
}

/// Rewrite relationship ids in place. Returns `false` when the fragment itself
/// must go, which is the case for hyperlinks whose target was dropped.
fn apply_mapping(fragment: &mut XmlFragment, mapping: &RelationshipMap) -> bool {
    let is_hyperlink = fragment
        .name()
        .map(|n| *n == A::hlinkClick() || *n == A::hlinkHover())
        .unwrap_or(false);

    if let XmlNodeData::Element { attributes, .. } = &mut fragment.data {
        let mut dropped = false;
        attributes.retain_mut(|attr| {
            if !is_relationship_attribute(&attr.name) || attr.value.is_empty() {
                return true;
            }
            match mapping.get(&attr.value) {
                Some(Some(new_id)) => {
                    attr.value = new_id.clone();
                    true
                }
                _ => {
                    dropped = true;
                    false
                }
            }
        });
        if dropped && is_hyperlink {
            return false;
        }
    }

    fragment
        .children
        .retain_mut(|child| apply_mapping(child, mapping));
    true
}
