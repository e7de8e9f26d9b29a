//! An accepted client connection.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(0);

/// One accepted byte stream, owned by exactly one handler.
///
/// Closing consumes the connection, so it can happen at most once. A
/// connection dropped on an error path is closed by the stream's own drop.
#[derive(Debug)]
pub struct Connection<S = TcpStream> {
    stream: S,
    peer: SocketAddr,
    id: u64,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a stream accepted from `peer`, giving it a fresh id.
    pub fn new(stream: S, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer,
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The process-unique id of this connection.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The remote address.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Perform a single read of at most `limit` bytes.
    ///
    /// Returns `None` if the peer closed without sending anything. A partial
    /// request is returned as is; no further reads are attempted.
    pub async fn read_once(&mut self, limit: usize) -> io::Result<Option<Vec<u8>>> {
        let mut buf = vec![0; limit];
        let n = self.stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(buf))
    }

    /// Write all of `bytes` and flush.
    pub async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    /// Shut down the write side and release the stream.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!("Client [ID {id}] shutdown failed: {e}", id = self.id);
        }
        debug!("Client [ID {id}] closed connection to {peer}", id = self.id, peer = self.peer);
    }
}
