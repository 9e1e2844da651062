//! IP value types: addresses, networks and the combined IP object.
//!
//! All three are small `Copy` values. Networks are kept canonical at all
//! times: the base address has every host bit zeroed, enforced by
//! [`Network::new`]. Containment between objects of different IP versions
//! is always false.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// IP protocol version of an address or network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Version number as used in export keys (4 or 6).
    pub fn number(self) -> u8 {
        match self {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }

    /// Width of an address of this version, in bits.
    pub fn max_prefix_len(self) -> u8 {
        match self {
            IpVersion::V4 => 32,
            IpVersion::V6 => 128,
        }
    }

    fn of(addr: &IpAddr) -> IpVersion {
        match addr {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }
}

impl Serialize for IpVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

/// Errors from constructing or parsing a [`Network`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("prefix length {prefix_len} too long for {version:?}")]
    PrefixTooLong { prefix_len: u8, version: IpVersion },

    #[error("host bits set in {addr}/{prefix_len}")]
    HostBitsSet { addr: IpAddr, prefix_len: u8 },

    #[error("invalid network syntax: {0}")]
    Syntax(String),
}

/// A single host address, IPv4 or IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(IpAddr);

impl Address {
    pub fn new(addr: IpAddr) -> Address {
        Address(addr)
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::of(&self.0)
    }

    pub fn ip(&self) -> IpAddr {
        self.0
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Address {
        Address(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Mask `addr` down to its first `prefix_len` bits.
///
/// Callers guarantee `prefix_len` is within range for the address version.
/// The shift-right-then-left form over a widened integer avoids overflow
/// for prefix length zero.
fn apply_mask(addr: IpAddr, prefix_len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let right = u32::from(32 - prefix_len);
            let bits = u64::from(u32::from(v4));
            IpAddr::V4(Ipv4Addr::from(((bits >> right) << right) as u32))
        }
        IpAddr::V6(v6) => {
            if prefix_len == 0 {
                return IpAddr::V6(Ipv6Addr::UNSPECIFIED);
            }
            let right = u32::from(128 - prefix_len);
            let bits = u128::from(v6);
            IpAddr::V6(Ipv6Addr::from((bits >> right) << right))
        }
    }
}

/// A network prefix in canonical form (host bits zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Network {
    addr: IpAddr,
    prefix_len: u8,
}

impl Network {
    /// Build a network from a base address and prefix length.
    ///
    /// The base must already be canonical; `10.0.0.1/24` is rejected with
    /// [`NetworkError::HostBitsSet`] rather than silently truncated.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Network, NetworkError> {
        let version = IpVersion::of(&addr);
        if prefix_len > version.max_prefix_len() {
            return Err(NetworkError::PrefixTooLong { prefix_len, version });
        }
        if apply_mask(addr, prefix_len) != addr {
            return Err(NetworkError::HostBitsSet { addr, prefix_len });
        }
        Ok(Network { addr, prefix_len })
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::of(&self.addr)
    }

    /// Base (network) address.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Whether this network covers the given host address.
    pub fn contains_address(&self, address: &Address) -> bool {
        self.version() == address.version() && apply_mask(address.ip(), self.prefix_len) == self.addr
    }

    /// Whether `other` is a proper subnet of this network.
    ///
    /// A network is never a proper subnet of itself.
    pub fn contains_network(&self, other: &Network) -> bool {
        self != other
            && self.version() == other.version()
            && self.prefix_len <= other.prefix_len
            && apply_mask(other.addr, self.prefix_len) == self.addr
    }

    /// Whether this network properly contains the given IP object.
    pub fn contains(&self, object: &IpObject) -> bool {
        match object {
            IpObject::Address(address) => self.contains_address(address),
            IpObject::Network(network) => self.contains_network(network),
        }
    }
}

impl FromStr for Network {
    type Err = NetworkError;

    /// Parse CIDR notation, e.g. `"192.0.2.0/24"` or `"2001:db8::/32"`.
    ///
    /// The `/prefixlen` part is mandatory: a bare address is an address,
    /// never a network.
    fn from_str(value: &str) -> Result<Network, NetworkError> {
        let (addr_part, len_part) = value
            .split_once('/')
            .ok_or_else(|| NetworkError::Syntax(value.to_string()))?;
        let addr: IpAddr = addr_part
            .parse()
            .map_err(|_| NetworkError::Syntax(value.to_string()))?;
        let prefix_len: u8 = len_part
            .parse()
            .map_err(|_| NetworkError::Syntax(value.to_string()))?;
        Network::new(addr, prefix_len)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A registered IP object: either a host address or a network prefix.
///
/// The universal key for descriptions and hierarchy membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpObject {
    Address(Address),
    Network(Network),
}

impl IpObject {
    pub fn version(&self) -> IpVersion {
        match self {
            IpObject::Address(address) => address.version(),
            IpObject::Network(network) => network.version(),
        }
    }
}

impl From<Address> for IpObject {
    fn from(address: Address) -> IpObject {
        IpObject::Address(address)
    }
}

impl From<Network> for IpObject {
    fn from(network: Network) -> IpObject {
        IpObject::Network(network)
    }
}

impl fmt::Display for IpObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpObject::Address(address) => address.fmt(f),
            IpObject::Network(network) => network.fmt(f),
        }
    }
}

impl Serialize for IpObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
