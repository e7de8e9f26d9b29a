//! Accepter tasks: the loops that take connections off the listening sockets.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use tokio::task::JoinHandle;

use crate::server::config::{AccepterCounts, AddressFamily};
use crate::server::connection::Connection;
use crate::server::error::Error;
use crate::server::handler::ConnectionHandler;
use crate::server::limit::{ConnectionLimit, ConnectionPermit};
use crate::server::listener::DualStackListener;
use crate::server::shutdown::{ShutdownSignal, StopListener};

/// Pause after a failed accept, so a persistent error does not spin.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// A running accepter task.
#[derive(Debug)]
struct AccepterHandle {
    id: usize,
    family: AddressFamily,
    task: JoinHandle<()>,
}

/// Every accepter task of the server.
///
/// Accepter ids are assigned IPv4 first, then IPv6, and are unique across
/// both families. Each accepted connection is handed to its own task; the
/// pool does not track or wait for those.
#[derive(Debug)]
pub struct AccepterPool {
    accepters: Vec<AccepterHandle>,
}

impl AccepterPool {
    /// Spawn `counts.get(family)` accepters for every family the listener
    /// has bound.
    pub fn spawn(
        listener: Arc<DualStackListener>,
        counts: AccepterCounts,
        handler: ConnectionHandler,
        limit: ConnectionLimit,
        shutdown: &ShutdownSignal,
    ) -> Self {
        let mut accepters = Vec::with_capacity(counts.total());

        for family in AddressFamily::ALL {
            if !listener.is_bound(family) {
                continue;
            }
            for _ in 0..counts.get(family) {
                let id = accepters.len();
                let accepter = Accepter {
                    id,
                    family,
                    listener: Arc::clone(&listener),
                    handler: handler.clone(),
                    limit: limit.clone(),
                    stop: shutdown.subscribe(),
                };
                accepters.push(AccepterHandle {
                    id,
                    family,
                    task: tokio::spawn(accepter.run()),
                });
            }
        }

        Self { accepters }
    }

    /// Number of accepter tasks.
    pub fn len(&self) -> usize {
        self.accepters.len()
    }

    /// Whether no accepter was spawned.
    pub fn is_empty(&self) -> bool {
        self.accepters.is_empty()
    }

    /// The `(id, family)` of every accepter, in id order.
    pub fn accepters(&self) -> Vec<(usize, AddressFamily)> {
        self.accepters.iter().map(|a| (a.id, a.family)).collect()
    }

    /// Wait for every accepter to exit. Does not wait for in-flight handlers.
    pub async fn join(self) {
        for accepter in self.accepters {
            if let Err(e) = accepter.task.await {
                error!(
                    "Accepter [ID {id}] ({family}) task failed: {e}",
                    id = accepter.id,
                    family = accepter.family
                );
            }
        }
    }
}

/// State owned by one accepter task.
struct Accepter {
    id: usize,
    family: AddressFamily,
    listener: Arc<DualStackListener>,
    handler: ConnectionHandler,
    limit: ConnectionLimit,
    stop: StopListener,
}

impl Accepter {
    async fn run(mut self) {
        self.log("Spawned.");

        while !self.stop.is_stopped() {
            self.log("Waiting for next client...");

            // Racing the stop signal makes shutdown immediate instead of
            // waiting for one more client
            let next = tokio::select! {
                biased;
                () = self.stop.stopped() => break,
                next = next_connection(&self.listener, &self.limit, self.family) => next,
            };

            match next {
                Some(Ok((conn, permit))) => {
                    let handler = self.handler.clone();
                    tokio::spawn(async move {
                        let _permit = permit;
                        handler.serve(conn).await;
                    });
                }
                Some(Err(e)) => {
                    warn!(
                        "Accepter [ID {id}] ({family}) Error accepting connection: {e}",
                        id = self.id,
                        family = self.family
                    );
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                }
                // The connection limit was closed
                None => break,
            }
        }

        self.log("Exiting.");
    }

    fn log(&self, msg: &str) {
        debug!("Accepter [ID {id}] ({family}) {msg}", id = self.id, family = self.family);
    }
}

/// Wait for an admission slot, then for a peer.
async fn next_connection(
    listener: &DualStackListener,
    limit: &ConnectionLimit,
    family: AddressFamily,
) -> Option<Result<(Connection, ConnectionPermit), Error>> {
    let permit = limit.acquire().await?;
    Some(listener.accept(family).await.map(|conn| (conn, permit)))
}
