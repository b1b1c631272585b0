//! portfwd: local TCP/Unix socket port forwarder
//!
//! Listens on one endpoint and, for every inbound connection, dials a fixed
//! target endpoint and relays bytes in both directions until either side
//! closes or fails.
//!
//! # Architecture
//!
//! - **Endpoint**: `[scheme://]address` parsing, stateless
//! - **Config**: the immutable listen/target pair built at startup
//! - **Net**: TCP and Unix stream sockets behind one listener/stream type
//! - **Forward**: startup probe, accept loop and per-connection relay
//!
//! # Example
//!
//! ```no_run
//! use portfwd::{config::Config, forward::Forwarder};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(":8080", "unix:///run/app.sock")?;
//! Forwarder::new(config).run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod endpoint;
pub mod forward;
pub mod net;
