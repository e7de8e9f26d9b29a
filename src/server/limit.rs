//! Admission control for connection handlers.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds how many connections are handled at once.
///
/// An unbounded limit hands out permits immediately. A bounded one makes the
/// accepter wait for a handler to finish before it accepts again.
#[derive(Debug, Clone, Default)]
pub struct ConnectionLimit {
    semaphore: Option<Arc<Semaphore>>,
}

/// A slot held for as long as a connection is being handled.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

impl ConnectionLimit {
    /// A limit that never blocks.
    pub fn unbounded() -> Self {
        Self { semaphore: None }
    }

    /// A limit of `max` concurrent connections.
    pub fn bounded(max: usize) -> Self {
        Self {
            semaphore: Some(Arc::new(Semaphore::new(max))),
        }
    }

    /// Build from the optional `max_connections` setting.
    pub fn from_max(max_connections: Option<usize>) -> Self {
        max_connections.map_or_else(Self::unbounded, Self::bounded)
    }

    /// Wait for a free slot. Returns `None` once the limit was closed.
    pub async fn acquire(&self) -> Option<ConnectionPermit> {
        match &self.semaphore {
            None => Some(ConnectionPermit { _permit: None }),
            Some(semaphore) => semaphore
                .clone()
                .acquire_owned()
                .await
                .ok()
                .map(|permit| ConnectionPermit {
                    _permit: Some(permit),
                }),
        }
    }

    /// Free slots, or `None` when unbounded.
    pub fn available(&self) -> Option<usize> {
        self.semaphore.as_ref().map(|s| s.available_permits())
    }

    /// Wake every waiter with `None`.
    pub fn close(&self) {
        if let Some(semaphore) = &self.semaphore {
            semaphore.close();
        }
    }
}
