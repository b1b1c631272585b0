//! Stream sockets addressed by [`Endpoint`].
//!
//! Maps an endpoint scheme onto a concrete tokio socket type:
//!
//! - `tcp`: TCP over any address family
//! - `tcp4`: TCP over IPv4 only
//! - `tcp6`: TCP over IPv6 only
//! - `unix`: Unix domain stream socket at a filesystem path
//!
//! Any other scheme parses fine as an endpoint but fails here with
//! `unknown network <scheme>`.

use crate::endpoint::Endpoint;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream, UnixListener, UnixStream};

/// Stream network named by an endpoint scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// TCP, any address family.
    Tcp,
    /// TCP, IPv4 only.
    Tcp4,
    /// TCP, IPv6 only.
    Tcp6,
    /// Unix domain stream socket.
    Unix,
}

impl Network {
    /// Look up the network for a scheme.
    pub fn from_scheme(scheme: &str) -> io::Result<Self> {
        match scheme {
            "tcp" => Ok(Self::Tcp),
            "tcp4" => Ok(Self::Tcp4),
            "tcp6" => Ok(Self::Tcp6),
            "unix" => Ok(Self::Unix),
            other => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unknown network {other}"),
            )),
        }
    }

    fn accepts(self, addr: &SocketAddr) -> bool {
        match self {
            Self::Tcp4 => addr.is_ipv4(),
            Self::Tcp6 => addr.is_ipv6(),
            Self::Tcp | Self::Unix => true,
        }
    }
}

/// Resolve `host:port` into the socket addresses allowed by `network`.
async fn resolve(network: Network, address: &str) -> io::Result<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(address)
        .await?
        .filter(|addr| network.accepts(addr))
        .collect();

    if addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no suitable address found for {address}"),
        ));
    }
    Ok(addrs)
}

/// Move IPv4 addresses ahead of IPv6 ones, keeping resolver order within
/// each family.
///
/// A `tcp` listener on a host name such as `localhost` binds the first
/// IPv4 address when there is one.
fn prefer_ipv4(addrs: &mut [SocketAddr]) {
    addrs.sort_by_key(|addr| !addr.is_ipv4());
}

/// A bound listening socket.
#[derive(Debug)]
pub enum Listener {
    /// TCP listener.
    Tcp(TcpListener),
    /// Unix domain socket listener.
    Unix(UnixListener),
}

impl Listener {
    /// Bind a listener on `endpoint`.
    ///
    /// For TCP every resolved address is tried in order, IPv4 first for the
    /// `tcp` network, and the last error is returned if none can be bound.
    /// An existing Unix socket file is not removed.
    pub async fn bind(endpoint: &Endpoint) -> io::Result<Self> {
        match Network::from_scheme(endpoint.scheme())? {
            Network::Unix => UnixListener::bind(endpoint.address()).map(Self::Unix),
            network => {
                let mut addrs = resolve(network, endpoint.address()).await?;
                if network == Network::Tcp {
                    prefer_ipv4(&mut addrs);
                }

                let mut last_err = None;
                for addr in addrs {
                    match TcpListener::bind(addr).await {
                        Ok(listener) => return Ok(Self::Tcp(listener)),
                        Err(e) => last_err = Some(e),
                    }
                }
                Err(last_err.unwrap_or_else(|| io::ErrorKind::AddrNotAvailable.into()))
            }
        }
    }

    /// Wait for the next inbound connection.
    ///
    /// Returns the stream together with a printable peer description.
    pub async fn accept(&self) -> io::Result<(Conn, String)> {
        match self {
            Self::Tcp(listener) => {
                let (stream, peer) = listener.accept().await?;
                Ok((Conn::Tcp(stream), peer.to_string()))
            }
            Self::Unix(listener) => {
                let (stream, peer) = listener.accept().await?;
                let peer = peer
                    .as_pathname()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                Ok((Conn::Unix(stream), peer))
            }
        }
    }

    /// The endpoint this listener is actually bound to.
    ///
    /// Useful after binding port 0.
    pub fn local_endpoint(&self) -> io::Result<Endpoint> {
        match self {
            Self::Tcp(listener) => Ok(Endpoint::new("tcp", listener.local_addr()?.to_string())),
            Self::Unix(listener) => {
                let addr = listener.local_addr()?;
                let path = addr.as_pathname().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "unix listener has no path")
                })?;
                Ok(Endpoint::new("unix", path.display().to_string()))
            }
        }
    }
}

/// Open a stream connection to `endpoint`.
///
/// For TCP every resolved address is tried in order; the last connect error
/// is returned when all of them fail.
pub async fn dial(endpoint: &Endpoint) -> io::Result<Conn> {
    match Network::from_scheme(endpoint.scheme())? {
        Network::Unix => UnixStream::connect(endpoint.address()).await.map(Conn::Unix),
        network => {
            let mut last_err = None;
            for addr in resolve(network, endpoint.address()).await? {
                match TcpStream::connect(addr).await {
                    Ok(stream) => return Ok(Conn::Tcp(stream)),
                    Err(e) => last_err = Some(e),
                }
            }
            Err(last_err.unwrap_or_else(|| io::ErrorKind::AddrNotAvailable.into()))
        }
    }
}

/// A connected stream socket.
#[derive(Debug)]
pub enum Conn {
    /// TCP stream.
    Tcp(TcpStream),
    /// Unix domain stream.
    Unix(UnixStream),
}

impl AsyncRead for Conn {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            Self::Unix(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Conn {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            Self::Unix(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_flush(cx),
            Self::Unix(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            Self::Unix(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}
