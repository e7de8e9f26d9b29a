//! Error types for the HTTP server.

use std::net::SocketAddr;

use thiserror::Error;

use crate::server::config::AddressFamily;

/// Errors that can occur while starting or running the server.
///
/// Parse rejections are not errors here; they are reported to the client.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested address family could not be bound.
    #[error("Failed to bind {family} socket to {addr}: {source}")]
    Bind {
        family: AddressFamily,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The host did not resolve to any address of the requested family.
    #[error("No {family} address found for host {host}")]
    NoAddress { family: AddressFamily, host: String },

    /// Host name resolution failed.
    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// The listener has no socket for this family.
    #[error("No {0} socket is bound")]
    FamilyNotBound(AddressFamily),

    /// The request bytes were not valid UTF-8.
    #[error("Request is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file could not be read as JSON.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The accepter counts were not of the form `<n4>,<n6>`.
    #[error("Invalid accepter counts {0:?}, expected <n4>,<n6>")]
    InvalidAccepters(String),
}
