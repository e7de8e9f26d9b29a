//! Connection intake for dualhttp-rs.
//!
//! A [`DualStackListener`] binds one socket per address family, an
//! [`AccepterPool`] runs the accept loops on them, and every accepted
//! [`Connection`] gets its own task running a [`ConnectionHandler`].
//! [`HttpServer`] ties these together and owns their lifecycle.

mod accepter;
mod config;
mod connection;
mod error;
mod handler;
mod http_server;
mod limit;
mod listener;
mod response;
mod shutdown;

// Re-export public items
pub use accepter::AccepterPool;
pub use config::{
    local_host_name, AccepterCounts, AddressFamily, ListenerConfig, ServerConfig, DEFAULT_PORT,
    DEFAULT_READ_BUFFER_SIZE,
};
pub use connection::Connection;
pub use error::Error;
pub use handler::{ConnectionHandler, HandlerOutcome};
pub use http_server::HttpServer;
pub use limit::{ConnectionLimit, ConnectionPermit};
pub use listener::{DualStackListener, BACKLOG};
pub use response::{DiagnosticResponse, STATUS_LINE};
pub use shutdown::{ShutdownSignal, StopListener};
