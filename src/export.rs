//! Read-only export of an address space snapshot.
//!
//! The snapshot has two parts: the flat description table, and one
//! nested containment tree per IP version present, rooted at the
//! top-level objects. Addresses are always leaves. The strictness flag
//! is not part of the snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ip::{IpObject, IpVersion};
use crate::space::hierarchy::{Hierarchy, ParentNode};

/// Nested containment tree: each key is a registered object, each value
/// the tree of its children. Leaves are empty maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NestedIpObjects(pub BTreeMap<IpObject, NestedIpObjects>);

/// Structural snapshot of an address space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedData {
    /// Copy of the full description table.
    pub descriptions: BTreeMap<IpObject, String>,
    /// Per-version nested containment trees of all registered objects.
    pub nested_ip_objects: BTreeMap<IpVersion, BTreeMap<IpObject, NestedIpObjects>>,
}

pub(crate) fn export(
    descriptions: &BTreeMap<IpObject, String>,
    hierarchy: &Hierarchy,
) -> ExportedData {
    let mut nested_ip_objects: BTreeMap<IpVersion, BTreeMap<IpObject, NestedIpObjects>> =
        BTreeMap::new();
    for top in hierarchy.children_of(&ParentNode::Root) {
        nested_ip_objects
            .entry(top.version())
            .or_default()
            .insert(*top, nested(hierarchy, top));
    }
    ExportedData {
        descriptions: descriptions.clone(),
        nested_ip_objects,
    }
}

// Recursion depth is bounded by prefix length, not object count.
fn nested(hierarchy: &Hierarchy, object: &IpObject) -> NestedIpObjects {
    let mut tree = NestedIpObjects::default();
    if let IpObject::Network(network) = object {
        for child in hierarchy.children_of(&ParentNode::Network(*network)) {
            tree.0.insert(*child, nested(hierarchy, child));
        }
    }
    tree
}
