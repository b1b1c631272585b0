//! Connection forwarding.
//!
//! # Lifecycle
//!
//! 1. Bind the listen endpoint
//! 2. Probe the target once; startup fails if it is unreachable
//! 3. Accept connections forever, one relay task per connection
//!
//! # Error Handling
//!
//! - Bind and probe errors are returned to the caller
//! - Accept errors are logged and the loop continues
//! - Relay dial, copy and close errors are swallowed; they only ever end the
//!   connection that produced them

mod error;
mod relay;
mod server;

pub use error::ForwardError;
pub use relay::handle_connection;
pub use server::{probe_target, Forwarder};
