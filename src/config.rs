//! Forwarder configuration.
//!
//! Both endpoints are parsed once at startup into an immutable [`Config`]
//! that is shared read-only by every relay.

use crate::cli::Cli;
use crate::endpoint::{parse_address, AddressError, Endpoint};
use thiserror::Error;

/// Errors that can occur while building the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The `--listen` value is malformed.
    #[error("error when parsing listen address: {0}")]
    Listen(#[source] AddressError),

    /// The `--target` value is malformed.
    #[error("error when parsing target address: {0}")]
    Target(#[source] AddressError),
}

/// Where to listen and where to forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    listen: Endpoint,
    target: Endpoint,
}

impl Config {
    /// Parse the listen and target endpoint strings.
    pub fn new(listen: &str, target: &str) -> Result<Self, ConfigError> {
        let listen = parse_address(listen).map_err(ConfigError::Listen)?;
        let target = parse_address(target).map_err(ConfigError::Target)?;
        Ok(Self { listen, target })
    }

    /// Build the configuration from parsed command-line arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::new(&cli.listen, &cli.target)
    }

    /// Endpoint the accept loop binds.
    pub fn listen(&self) -> &Endpoint {
        &self.listen
    }

    /// Endpoint every relay dials.
    pub fn target(&self) -> &Endpoint {
        &self.target
    }
}
