//! IP value types and canonicalization.
//!
//! This module provides the immutable building blocks of the address
//! space: host addresses, canonical network prefixes, the combined
//! [`IpObject`] sum type, and the cleaners that turn user input into
//! those values.

pub mod object;
pub mod parse;

// Re-export commonly used types
pub use object::{Address, IpObject, IpVersion, Network, NetworkError};
pub use parse::{clean_address, clean_network, IpParam};
