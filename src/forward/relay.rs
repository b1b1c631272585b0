//! Per-connection relay.
//!
//! Each accepted connection gets its own relay task which dials the target
//! and then copies bytes in both directions:
//!
//! ```text
//!  inbound peer ──► server_conn ──(client → target, inline)──► client_conn ──► target
//!  inbound peer ◄── server_conn ◄─(target → client, spawned)── client_conn ◄── target
//! ```
//!
//! Whichever direction stops first, by EOF or by an I/O error on either of
//! its sockets, closes both sockets. The other direction is woken through a
//! shared close signal and drops its halves too, so the pair never outlives
//! the first direction to finish. There are no timeouts: a peer that neither
//! sends nor closes keeps its relay alive indefinitely.

use crate::config::Config;
use crate::net::{self, Conn};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle one inbound connection.
///
/// Runs in its own task; the accept loop never observes the outcome.
pub async fn handle_connection(server_conn: Conn, config: Arc<Config>) {
    // Intentionally silent: a failed dial drops the inbound connection with
    // no log and no retry.
    let Ok(client_conn) = net::dial(config.target()).await else {
        return;
    };

    // Dropping the handle detaches the reverse direction.
    drop(relay(server_conn, client_conn).await);
}

/// Copy bytes between an inbound connection and its outbound counterpart.
///
/// Spawns the `target → client` direction and runs `client → target` on the
/// current task. Returns once the inline direction is done, handing back the
/// spawned direction's handle.
pub(crate) async fn relay<S, C>(server_conn: S, client_conn: C) -> JoinHandle<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    C: AsyncRead + AsyncWrite + Send + 'static,
{
    let (server_read, server_write) = tokio::io::split(server_conn);
    let (client_read, client_write) = tokio::io::split(client_conn);

    let (close_tx, close_rx) = watch::channel(false);
    let close_tx = Arc::new(close_tx);

    let reverse = tokio::spawn(pipe(
        client_read,
        server_write,
        Arc::clone(&close_tx),
        close_rx.clone(),
    ));
    pipe(server_read, client_write, close_tx, close_rx).await;

    reverse
}

/// Copy `src` into `dst` until EOF, an error, or the other direction closing.
///
/// On return both sockets of the pair are being torn down: this direction
/// drops its halves and the close signal makes the other direction drop its
/// halves as well. Copy and close errors are discarded.
async fn pipe<R, W>(
    mut src: ReadHalf<R>,
    mut dst: WriteHalf<W>,
    close_tx: Arc<watch::Sender<bool>>,
    mut close_rx: watch::Receiver<bool>,
) where
    R: AsyncRead,
    W: AsyncWrite,
{
    tokio::select! {
        _ = tokio::io::copy(&mut src, &mut dst) => {}
        _ = close_rx.changed() => {}
    }

    close_tx.send_replace(true);
    // May race with the other direction; shutting down twice is harmless.
    let _ = dst.shutdown().await;
}
