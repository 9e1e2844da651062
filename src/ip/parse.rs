//! Canonicalization of user-supplied IP parameters.
//!
//! A parameter is interpreted first as a host address, then as a network
//! prefix. The two grammars are disjoint: the `/prefixlen` suffix is
//! mandatory for networks, so no string is ever both. Malformed input
//! yields `None` from both cleaners rather than an error.

use std::fmt;
use std::net::IpAddr;

use super::object::{Address, IpObject, Network};

/// Interpret a string as a host address, or `None` if it is not one.
pub fn clean_address(value: &str) -> Option<Address> {
    value.parse::<IpAddr>().ok().map(Address::new)
}

/// Interpret a string as a network prefix, or `None` if it is not one.
///
/// Requires canonical CIDR form: base address with host bits zero and an
/// explicit `/prefixlen`.
pub fn clean_network(value: &str) -> Option<Network> {
    value.parse::<Network>().ok()
}

/// An IP parameter as accepted by the registry operations: either a
/// pre-built value or a textual representation still to be canonicalized.
#[derive(Debug, Clone)]
pub enum IpParam {
    Text(String),
    Object(IpObject),
}

impl IpParam {
    /// Resolve this parameter to an IP object, if it denotes one.
    pub fn canonicalize(&self) -> Option<IpObject> {
        match self {
            IpParam::Text(text) => clean_address(text)
                .map(IpObject::Address)
                .or_else(|| clean_network(text).map(IpObject::Network)),
            IpParam::Object(object) => Some(*object),
        }
    }
}

impl fmt::Display for IpParam {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpParam::Text(text) => f.write_str(text),
            IpParam::Object(object) => object.fmt(f),
        }
    }
}

impl From<&str> for IpParam {
    fn from(value: &str) -> IpParam {
        IpParam::Text(value.to_string())
    }
}

impl From<String> for IpParam {
    fn from(value: String) -> IpParam {
        IpParam::Text(value)
    }
}

impl From<IpAddr> for IpParam {
    fn from(value: IpAddr) -> IpParam {
        IpParam::Object(IpObject::Address(Address::new(value)))
    }
}

impl From<Address> for IpParam {
    fn from(value: Address) -> IpParam {
        IpParam::Object(IpObject::Address(value))
    }
}

impl From<Network> for IpParam {
    fn from(value: Network) -> IpParam {
        IpParam::Object(IpObject::Network(value))
    }
}

impl From<IpObject> for IpParam {
    fn from(value: IpObject) -> IpParam {
        IpParam::Object(value)
    }
}
