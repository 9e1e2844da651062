//! # Addrspace - In-memory IP address space registry
//!
//! This library attaches human-readable descriptions to IP addresses and
//! network prefixes (IPv4/IPv6) and answers "what, if anything, is known
//! about this object?" by walking a containment hierarchy: a host address
//! is contained in any prefix that covers it, a smaller prefix in any
//! larger one. It is the longest-prefix-match structure of routers and
//! IPAM tools, generalized to carry per-object metadata and enforce
//! organizational delegation rules.
//!
//! ## Overview
//!
//! An [`AddressSpace`] keeps one containment tree per IP version plus a
//! virtual root. Inserting a network re-parents every registered object
//! it covers; deleting one either promotes its children one level up or
//! cascades through all of its descendants. Lookups distinguish three
//! outcomes: explicitly described, covered by a described network but not
//! itself described (the empty string), and unknown.
//!
//! In strict mode (the default) every description except a fresh
//! delegation requires a pre-existing enclosing network, so an address
//! plan has to be declared top-down.
//!
//! ## Architecture
//!
//! - `ip`: address, network and IP object value types, canonicalization
//! - `space`: the registry and its containment hierarchy
//! - `export`: read-only nested snapshots of a registry
//!
//! ## Example Usage
//!
//! ```rust
//! use addrspace::AddressSpace;
//!
//! let mut space = AddressSpace::new(true);
//! space.describe_new_delegated_network("10.0.0.0/8", "private block")?;
//! space.describe("10.1.2.3", "gateway")?;
//!
//! assert_eq!(space.description("10.1.2.3")?, Some("gateway"));
//! assert_eq!(space.description("10.9.9.9")?, Some("")); // covered, undescribed
//! assert_eq!(space.description("11.0.0.0")?, None); // outside the space
//! # Ok::<(), addrspace::AddressSpaceError>(())
//! ```
//!
//! ## Concurrency
//!
//! The registry is a plain mutable structure with no internal locking;
//! all mutating operations take `&mut self`. Wrap it in a lock if it has
//! to be shared.

pub mod export;
pub mod ip;
pub mod space;

pub use export::{ExportedData, NestedIpObjects};
pub use ip::{clean_address, clean_network, Address, IpObject, IpParam, IpVersion, Network, NetworkError};
pub use space::{AddressSpace, AddressSpaceError};
