//! Listener setup, startup probe and accept loop.

use super::error::ForwardError;
use super::relay::handle_connection;
use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::net::{self, Listener};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

/// Connect to `target` once and close the connection.
///
/// The dial error is returned as is.
pub async fn probe_target(target: &Endpoint) -> io::Result<()> {
    let mut conn = net::dial(target).await?;
    let _ = conn.shutdown().await;
    Ok(())
}

/// A port forwarder for one listen/target pair.
#[derive(Debug, Clone)]
pub struct Forwarder {
    config: Arc<Config>,
}

impl Forwarder {
    /// Create a forwarder for `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The configuration shared with every relay.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bind the listen endpoint.
    pub async fn bind(&self) -> Result<Listener, ForwardError> {
        let endpoint = self.config.listen();
        Listener::bind(endpoint)
            .await
            .map_err(|source| ForwardError::Bind {
                endpoint: endpoint.clone(),
                source,
            })
    }

    /// Check that the target accepts connections.
    pub async fn probe(&self) -> Result<(), ForwardError> {
        probe_target(self.config.target())
            .await
            .map_err(ForwardError::Probe)
    }

    /// Accept connections forever, spawning one relay task per connection.
    ///
    /// Accept errors are logged and the loop continues. A listener that
    /// fails permanently keeps the loop spinning on errors.
    pub async fn serve(&self, listener: Listener) {
        loop {
            match listener.accept().await {
                Ok((conn, peer)) => {
                    debug!("Accepted connection from {}", peer);
                    tokio::spawn(handle_connection(conn, Arc::clone(&self.config)));
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }

    /// Bind, probe the target, then serve.
    ///
    /// Only returns on a startup error.
    pub async fn run(&self) -> Result<(), ForwardError> {
        let listener = self.bind().await?;
        self.probe().await?;
        self.serve(listener).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_probe_target_success() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = Endpoint::new("tcp", listener.local_addr().unwrap().to_string());

        probe_target(&target).await.unwrap();

        // The probe connection is closed right away.
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let n = timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_forwarder_config_is_shared_config() {
        let forwarder = Forwarder::new(Config::new(":8080", "tcp6://[::1]:80").unwrap());
        assert_eq!(forwarder.config().listen().to_string(), "tcp://localhost:8080");
        assert_eq!(forwarder.config().target().to_string(), "tcp6://[::1]:80");

        let clone = forwarder.clone();
        assert!(std::ptr::eq(clone.config(), forwarder.config()));
    }

    #[tokio::test]
    async fn test_probe_target_unknown_network() {
        let err = probe_target(&Endpoint::new("udp6", "srv1525:3306"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown network udp6");
    }

    #[tokio::test]
    async fn test_forwarder_probe_error_is_transparent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = format!("unix://{}", temp_dir.path().join("none.sock").display());
        let forwarder = Forwarder::new(Config::new(":0", &target).unwrap());

        let err = forwarder.probe().await.unwrap_err();
        let ForwardError::Probe(inner) = &err else {
            panic!("expected probe error, got {err:?}");
        };
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[tokio::test]
    async fn test_forwarder_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let listen = taken.local_addr().unwrap().to_string();
        let forwarder = Forwarder::new(Config::new(&listen, &listen).unwrap());

        match forwarder.bind().await {
            Err(ForwardError::Bind { endpoint, .. }) => {
                assert_eq!(endpoint.to_string(), format!("tcp://{listen}"));
            }
            other => panic!("expected bind error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_fails_on_unreachable_target() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = format!("unix://{}", temp_dir.path().join("none.sock").display());
        let forwarder = Forwarder::new(Config::new("127.0.0.1:0", &target).unwrap());

        let result = timeout(Duration::from_secs(5), forwarder.run()).await.unwrap();
        assert!(matches!(result, Err(ForwardError::Probe(_))));
    }
}
