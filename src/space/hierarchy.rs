//! Containment hierarchy for registered IP objects.
//!
//! One tree per IP version plus a shared virtual root. Every registered
//! object has exactly one parent: the narrowest currently-registered
//! network that contains it, or [`ParentNode::Root`] if none does. That
//! invariant is re-established on every network insert (re-parenting) and
//! every removal (promotion).

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::ip::{Address, IpObject, IpVersion, Network};

/// Parent slot of a registered object: an enclosing registered network,
/// or the virtual root standing in for "no enclosing network".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum ParentNode {
    Root,
    Network(Network),
}

/// Forest of registered IP objects, maintaining parent and children maps
/// alongside per-version membership sets.
///
/// Ordered maps keep iteration (and therefore export output and
/// re-parenting scans) deterministic.
#[derive(Debug, Default)]
pub(crate) struct Hierarchy {
    networks: BTreeMap<IpVersion, BTreeSet<Network>>,
    addresses: BTreeMap<IpVersion, BTreeSet<Address>>,
    parent: BTreeMap<IpObject, ParentNode>,
    children: BTreeMap<ParentNode, BTreeSet<IpObject>>,
}

impl Hierarchy {
    /// Most specific registered network of the object's version that
    /// properly contains it, if any.
    ///
    /// A network never counts as its own supernet. Linear scan over the
    /// per-version set; registered (base, prefixlen) pairs are unique, so
    /// the longest matching prefix is unambiguous.
    pub fn narrowest_supernet(&self, object: &IpObject) -> Option<Network> {
        let registered = self.networks.get(&object.version())?;
        registered
            .iter()
            .filter(|candidate| candidate.contains(object))
            .max_by_key(|candidate| candidate.prefix_len())
            .copied()
    }

    /// Register a host address under the given parent.
    pub fn insert_address(&mut self, address: Address, parent: ParentNode) {
        self.addresses
            .entry(address.version())
            .or_default()
            .insert(address);
        self.attach(IpObject::Address(address), parent);
    }

    /// Register a network under the given parent, then re-parent: any
    /// existing child of that parent which the new network properly
    /// contains moves beneath it.
    pub fn insert_network(&mut self, network: Network, parent: ParentNode) {
        let object = IpObject::Network(network);
        self.networks
            .entry(network.version())
            .or_default()
            .insert(network);
        self.attach(object, parent);

        let displaced: Vec<IpObject> = self
            .children_of(&parent)
            .copied()
            .filter(|sibling| *sibling != object && network.contains(sibling))
            .collect();
        for child in displaced {
            debug!("re-parenting {child} under {network}");
            self.attach(child, ParentNode::Network(network));
        }
    }

    /// Remove an object. Children of a removed network are promoted to
    /// its former parent.
    pub fn remove(&mut self, object: &IpObject) {
        let former = match self.parent.remove(object) {
            Some(parent) => parent,
            None => return,
        };
        self.detach_child(&former, object);
        match object {
            IpObject::Address(address) => {
                if let Some(set) = self.addresses.get_mut(&address.version()) {
                    set.remove(address);
                }
            }
            IpObject::Network(network) => {
                if let Some(set) = self.networks.get_mut(&network.version()) {
                    set.remove(network);
                }
                if let Some(orphans) = self.children.remove(&ParentNode::Network(*network)) {
                    for orphan in orphans {
                        debug!("promoting {orphan} after removal of {network}");
                        self.parent.insert(orphan, former);
                        self.children.entry(former).or_default().insert(orphan);
                    }
                }
            }
        }
    }

    /// All transitive descendants of a network, collected with an
    /// explicit work-list. Parents precede their children, so consuming
    /// the result in reverse removes leaves first.
    pub fn subtree(&self, network: &Network) -> Vec<IpObject> {
        let mut collected = Vec::new();
        let mut work: Vec<IpObject> = self
            .children_of(&ParentNode::Network(*network))
            .copied()
            .collect();
        while let Some(object) = work.pop() {
            if let IpObject::Network(child) = &object {
                work.extend(self.children_of(&ParentNode::Network(*child)).copied());
            }
            collected.push(object);
        }
        collected
    }

    pub fn children_of<'a>(&'a self, parent: &ParentNode) -> impl Iterator<Item = &'a IpObject> {
        self.children.get(parent).into_iter().flatten()
    }

    #[cfg(test)]
    pub fn parent_of(&self, object: &IpObject) -> Option<ParentNode> {
        self.parent.get(object).copied()
    }

    /// Point `object` at `parent`, detaching it from any former parent.
    fn attach(&mut self, object: IpObject, parent: ParentNode) {
        if let Some(former) = self.parent.insert(object, parent) {
            if former != parent {
                self.detach_child(&former, &object);
            }
        }
        self.children.entry(parent).or_default().insert(object);
    }

    fn detach_child(&mut self, parent: &ParentNode, object: &IpObject) {
        if let Some(set) = self.children.get_mut(parent) {
            set.remove(object);
            if set.is_empty() {
                self.children.remove(parent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(s: &str) -> Network {
        s.parse().unwrap()
    }

    fn address(s: &str) -> Address {
        Address::new(s.parse().unwrap())
    }

    #[test]
    fn test_narrowest_supernet_prefers_longest_prefix() {
        let mut hierarchy = Hierarchy::default();
        hierarchy.insert_network(network("10.0.0.0/8"), ParentNode::Root);
        hierarchy.insert_network(network("10.1.0.0/16"), ParentNode::Network(network("10.0.0.0/8")));

        let object = IpObject::Address(address("10.1.2.3"));
        assert_eq!(hierarchy.narrowest_supernet(&object), Some(network("10.1.0.0/16")));

        let outside = IpObject::Address(address("11.0.0.1"));
        assert_eq!(hierarchy.narrowest_supernet(&outside), None);
    }

    #[test]
    fn test_narrowest_supernet_excludes_self() {
        let mut hierarchy = Hierarchy::default();
        hierarchy.insert_network(network("10.0.0.0/8"), ParentNode::Root);
        let object = IpObject::Network(network("10.0.0.0/8"));
        assert_eq!(hierarchy.narrowest_supernet(&object), None);
    }

    #[test]
    fn test_narrowest_supernet_is_version_scoped() {
        let mut hierarchy = Hierarchy::default();
        hierarchy.insert_network(network("0.0.0.0/0"), ParentNode::Root);
        let v6 = IpObject::Address(address("2001:db8::1"));
        assert_eq!(hierarchy.narrowest_supernet(&v6), None);
    }

    #[test]
    fn test_insert_network_reparents_contained_children_only() {
        let mut hierarchy = Hierarchy::default();
        let top = network("192.0.2.0/24");
        hierarchy.insert_network(top, ParentNode::Root);
        hierarchy.insert_address(address("192.0.2.200"), ParentNode::Network(top));
        hierarchy.insert_address(address("192.0.2.10"), ParentNode::Network(top));

        // Inserting the /25 afterwards pulls only the covered address down.
        let lower_half = network("192.0.2.128/25");
        hierarchy.insert_network(lower_half, ParentNode::Network(top));

        assert_eq!(
            hierarchy.parent_of(&IpObject::Address(address("192.0.2.200"))),
            Some(ParentNode::Network(lower_half))
        );
        assert_eq!(
            hierarchy.parent_of(&IpObject::Address(address("192.0.2.10"))),
            Some(ParentNode::Network(top))
        );
        assert_eq!(
            hierarchy.parent_of(&IpObject::Network(lower_half)),
            Some(ParentNode::Network(top))
        );
    }

    #[test]
    fn test_remove_promotes_children() {
        let mut hierarchy = Hierarchy::default();
        let top = network("10.0.0.0/8");
        let mid = network("10.1.0.0/16");
        hierarchy.insert_network(top, ParentNode::Root);
        hierarchy.insert_network(mid, ParentNode::Network(top));
        hierarchy.insert_address(address("10.1.2.3"), ParentNode::Network(mid));

        hierarchy.remove(&IpObject::Network(mid));

        assert_eq!(
            hierarchy.parent_of(&IpObject::Address(address("10.1.2.3"))),
            Some(ParentNode::Network(top))
        );
        assert_eq!(hierarchy.parent_of(&IpObject::Network(mid)), None);
        let object = IpObject::Address(address("10.1.2.3"));
        assert_eq!(hierarchy.narrowest_supernet(&object), Some(top));
    }

    #[test]
    fn test_subtree_lists_parents_before_children() {
        let mut hierarchy = Hierarchy::default();
        let top = network("10.0.0.0/8");
        let mid = network("10.1.0.0/16");
        hierarchy.insert_network(top, ParentNode::Root);
        hierarchy.insert_network(mid, ParentNode::Network(top));
        hierarchy.insert_address(address("10.1.2.3"), ParentNode::Network(mid));
        hierarchy.insert_address(address("10.200.0.1"), ParentNode::Network(top));

        let collected = hierarchy.subtree(&top);
        assert_eq!(collected.len(), 3);
        let mid_at = collected
            .iter()
            .position(|o| *o == IpObject::Network(mid))
            .unwrap();
        let leaf_at = collected
            .iter()
            .position(|o| *o == IpObject::Address(address("10.1.2.3")))
            .unwrap();
        assert!(mid_at < leaf_at);
    }
}
