//! The address space registry.
//!
//! [`AddressSpace`] owns the description table, the containment
//! hierarchy, and the strictness policy, and exposes the only mutation
//! surface of the crate: describe, describe-new-delegation, lookup,
//! delete, export. Every precondition check happens before any state
//! change, so a failed operation leaves the space untouched.

pub(crate) mod hierarchy;

use std::collections::BTreeMap;

use log::debug;

use crate::export::{self, ExportedData};
use crate::ip::{IpObject, IpParam, Network};
use hierarchy::{Hierarchy, ParentNode};

/// Errors raised by [`AddressSpace`] operations.
///
/// All are local, synchronous input errors; nothing is transient or
/// retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressSpaceError {
    /// Parameter does not canonicalize to an address or network, or has
    /// the wrong shape for the operation.
    #[error("invalid IP parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("no empty description allowed")]
    EmptyDescription,

    /// Strict mode requires an enclosing network that is absent, or a new
    /// delegation found an enclosing network that must be absent.
    #[error("supernet constraint violated for {object}")]
    StrictSupernet { object: IpObject },

    #[error("network {network} already delegated")]
    SameDelegationAsNew { network: Network },

    #[error("{object} not registered in address space")]
    ObjectNotRegistered { object: IpObject },
}

/// An in-memory IP address space: descriptions attached to addresses and
/// network prefixes, organized by containment.
///
/// In strict mode (the default) every description except a fresh
/// delegation requires a pre-existing enclosing network. The flag is
/// fixed at construction.
#[derive(Debug)]
pub struct AddressSpace {
    strict: bool,
    descriptions: BTreeMap<IpObject, String>,
    hierarchy: Hierarchy,
}

impl Default for AddressSpace {
    fn default() -> Self {
        AddressSpace::new(true)
    }
}

impl AddressSpace {
    pub fn new(strict: bool) -> AddressSpace {
        AddressSpace {
            strict,
            descriptions: BTreeMap::new(),
            hierarchy: Hierarchy::default(),
        }
    }

    /// Whether this space enforces the enclosing-network rule.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Attach a description to an address or network.
    ///
    /// In strict mode the object must already be covered by a registered
    /// network. Inserting a network re-parents any registered object it
    /// properly contains.
    pub fn describe(
        &mut self,
        ip_parameter: impl Into<IpParam>,
        description: &str,
    ) -> Result<(), AddressSpaceError> {
        ensure_description(description)?;
        let object = canonical(ip_parameter.into())?;
        self.describe_object(object, description, false)
    }

    /// Declare a fresh administrative block: a network with no enclosing
    /// registered network.
    ///
    /// Unlike [`describe`](Self::describe) this works in strict mode
    /// without a supernet, and fails — regardless of the strict flag — if
    /// a supernet exists ([`AddressSpaceError::StrictSupernet`]) or the
    /// exact network is already registered
    /// ([`AddressSpaceError::SameDelegationAsNew`]).
    pub fn describe_new_delegated_network(
        &mut self,
        network_parameter: impl Into<IpParam>,
        description: &str,
    ) -> Result<(), AddressSpaceError> {
        let object = canonical(network_parameter.into())?;
        let network = match object {
            IpObject::Network(network) => network,
            IpObject::Address(_) => {
                return Err(AddressSpaceError::InvalidParameter {
                    reason: "no address as parameter".to_string(),
                })
            }
        };
        if self.hierarchy.narrowest_supernet(&object).is_some() {
            return Err(AddressSpaceError::StrictSupernet { object });
        }
        if self.descriptions.contains_key(&object) {
            return Err(AddressSpaceError::SameDelegationAsNew { network });
        }
        ensure_description(description)?;
        self.describe_object(object, description, true)
    }

    /// Look up what is known about an address or network.
    ///
    /// Three-way result: `Some(text)` for an explicitly described object,
    /// `Some("")` for an object covered by a registered network but not
    /// itself described, `None` for an object outside the address space.
    /// Callers must not conflate the empty string with absence.
    pub fn description(
        &self,
        ip_parameter: impl Into<IpParam>,
    ) -> Result<Option<&str>, AddressSpaceError> {
        let object = canonical(ip_parameter.into())?;
        if let Some(text) = self.descriptions.get(&object) {
            return Ok(Some(text));
        }
        if self.hierarchy.narrowest_supernet(&object).is_some() {
            return Ok(Some(""));
        }
        Ok(None)
    }

    /// Remove a registered object.
    ///
    /// Without `cascade`, children of a removed network are promoted to
    /// its former parent. With `cascade`, the network and all of its
    /// transitive descendants are removed.
    pub fn delete(
        &mut self,
        ip_parameter: impl Into<IpParam>,
        cascade: bool,
    ) -> Result<(), AddressSpaceError> {
        let object = canonical(ip_parameter.into())?;
        if !self.descriptions.contains_key(&object) {
            return Err(AddressSpaceError::ObjectNotRegistered { object });
        }
        if cascade {
            if let IpObject::Network(network) = &object {
                // Deepest-first, so promotion never fires mid-cascade.
                let doomed = self.hierarchy.subtree(network);
                for descendant in doomed.iter().rev() {
                    debug!("cascading delete of {descendant}");
                    self.hierarchy.remove(descendant);
                    self.descriptions.remove(descendant);
                }
            }
        }
        debug!("deleting {object} (cascade: {cascade})");
        self.hierarchy.remove(&object);
        self.descriptions.remove(&object);
        Ok(())
    }

    /// Read-only snapshot: the full description table plus the nested
    /// per-version containment trees.
    pub fn export_data(&self) -> ExportedData {
        export::export(&self.descriptions, &self.hierarchy)
    }

    fn describe_object(
        &mut self,
        object: IpObject,
        description: &str,
        is_new_delegation: bool,
    ) -> Result<(), AddressSpaceError> {
        match object {
            IpObject::Address(address) => {
                if is_new_delegation {
                    return Err(AddressSpaceError::InvalidParameter {
                        reason: "delegation applies to networks only".to_string(),
                    });
                }
                let supernet = self.hierarchy.narrowest_supernet(&object);
                if self.strict && supernet.is_none() {
                    return Err(AddressSpaceError::StrictSupernet { object });
                }
                let parent = supernet.map(ParentNode::Network).unwrap_or(ParentNode::Root);
                self.hierarchy.insert_address(address, parent);
            }
            IpObject::Network(network) => {
                let supernet = self.hierarchy.narrowest_supernet(&object);
                if is_new_delegation && supernet.is_some() {
                    return Err(AddressSpaceError::InvalidParameter {
                        reason: format!("new delegation {network} has a registered supernet"),
                    });
                }
                if self.strict && supernet.is_none() && !is_new_delegation {
                    return Err(AddressSpaceError::StrictSupernet { object });
                }
                let parent = supernet.map(ParentNode::Network).unwrap_or(ParentNode::Root);
                self.hierarchy.insert_network(network, parent);
            }
        }
        debug!("registered {object}");
        self.descriptions.insert(object, description.to_string());
        Ok(())
    }
}

fn ensure_description(description: &str) -> Result<(), AddressSpaceError> {
    if description.is_empty() {
        return Err(AddressSpaceError::EmptyDescription);
    }
    Ok(())
}

fn canonical(param: IpParam) -> Result<IpObject, AddressSpaceError> {
    param
        .canonicalize()
        .ok_or_else(|| AddressSpaceError::InvalidParameter {
            reason: format!("'{param}' is neither an IP address nor an IP network"),
        })
}
