//! Endpoint addresses.
//!
//! An endpoint is a `(scheme, address)` pair written as `scheme://address`.
//! The scheme names the network family (`tcp`, `tcp4`, `tcp6`, `unix`) and
//! defaults to `tcp` when omitted. A bare `:PORT` is shorthand for
//! `tcp://localhost:PORT`.
//!
//! ```
//! use portfwd::endpoint::parse_address;
//!
//! let ep = parse_address(":8080").unwrap();
//! assert_eq!(ep.to_string(), "tcp://localhost:8080");
//! ```

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the scheme and the address.
pub const SCHEME_SEPARATOR: &str = "://";

/// Scheme used when the string does not name one.
pub const DEFAULT_SCHEME: &str = "tcp";

/// Host used for the `:PORT` shorthand.
pub const DEFAULT_HOST: &str = "localhost";

/// Errors from parsing an endpoint string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string was empty after trimming.
    #[error("address cannot be empty")]
    Empty,

    /// The string contained the scheme separator more than once.
    #[error("the address cannot contain more than one '://'")]
    MultipleSeparators,

    /// A separator was present but nothing preceded it.
    #[error("network not specified")]
    MissingNetwork,
}

/// A network identity to listen on or dial.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    scheme: String,
    address: String,
}

impl Endpoint {
    /// Create an endpoint from its parts without validation.
    pub fn new(scheme: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            address: address.into(),
        }
    }

    /// Network scheme, e.g. `tcp` or `unix`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Address within the network, e.g. `host:port` or a socket path.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scheme, SCHEME_SEPARATOR, self.address)
    }
}

impl FromStr for Endpoint {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

/// Parse an endpoint string.
///
/// Only the address after `://` is taken verbatim; it is not checked for
/// host or port syntax. Resolution happens when the endpoint is dialed.
pub fn parse_address(raw: &str) -> Result<Endpoint, AddressError> {
    let raw = raw.trim_matches(' ');
    if raw.is_empty() {
        return Err(AddressError::Empty);
    }

    if raw.starts_with(':') && !raw.starts_with(SCHEME_SEPARATOR) {
        return Ok(Endpoint::new(DEFAULT_SCHEME, format!("{DEFAULT_HOST}{raw}")));
    }

    let parts: Vec<&str> = raw.split(SCHEME_SEPARATOR).collect();
    match parts.as_slice() {
        [address] => Ok(Endpoint::new(DEFAULT_SCHEME, *address)),
        ["", _] => Err(AddressError::MissingNetwork),
        [scheme, address] => Ok(Endpoint::new(*scheme, *address)),
        _ => Err(AddressError::MultipleSeparators),
    }
}
