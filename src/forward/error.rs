//! Error types for forwarder startup.
//!
//! Only startup can fail. Errors after the accept loop starts are contained
//! to the connection or accept attempt that produced them.

use crate::endpoint::Endpoint;
use thiserror::Error;

/// Errors that stop the forwarder from starting.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Failed to bind the listen endpoint.
    #[error("failed to listen on {endpoint}: {source}")]
    Bind {
        /// The endpoint we tried to bind.
        endpoint: Endpoint,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The startup probe could not reach the target.
    #[error(transparent)]
    Probe(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_bind_error() {
        let err = ForwardError::Bind {
            endpoint: Endpoint::new("tcp", "localhost:8080"),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        assert_eq!(
            err.to_string(),
            "failed to listen on tcp://localhost:8080: address in use"
        );
    }

    #[test]
    fn test_probe_error_is_unwrapped() {
        let err = ForwardError::Probe(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(err.to_string(), "connection refused");
    }
}
