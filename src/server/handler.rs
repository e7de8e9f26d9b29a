//! Per-connection request handling.

use std::sync::Arc;

use log::{debug, error};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::parser::RequestParser;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::error::Error;
use crate::server::response::DiagnosticResponse;

/// How a handled connection ended, when it ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The peer closed before sending anything; nothing was parsed or written.
    PeerClosed,
    /// A response carrying this parse outcome code was written.
    Responded { code: u8 },
}

/// Handles exactly one request per connection: one read, one parse, one
/// write, then close.
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    parser: Arc<RequestParser>,
    read_buffer_size: usize,
}

impl ConnectionHandler {
    /// Create a handler using `parser` and reading at most `read_buffer_size`
    /// bytes per connection.
    pub fn new(parser: RequestParser, read_buffer_size: usize) -> Self {
        Self {
            parser: Arc::new(parser),
            read_buffer_size,
        }
    }

    /// Create a handler from the server configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(RequestParser::new(config.rules.clone()), config.read_buffer_size)
    }

    /// Handle a connection and close it, whatever the outcome.
    ///
    /// Parse rejections are successful outcomes; only I/O and UTF-8 decode
    /// failures are returned as errors.
    pub async fn handle<S>(&self, mut conn: Connection<S>) -> Result<HandlerOutcome, Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        debug!("Client [ID {id}] Spawned for {peer}", id = conn.id(), peer = conn.peer());
        let result = self.converse(&mut conn).await;
        conn.close().await;
        result
    }

    /// Handle a connection, logging instead of returning any error so that
    /// nothing escapes the connection's task.
    pub async fn serve<S>(&self, conn: Connection<S>)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let id = conn.id();
        match self.handle(conn).await {
            Ok(HandlerOutcome::PeerClosed) => {
                debug!("Client [ID {id}] Peer closed before sending data");
            }
            Ok(HandlerOutcome::Responded { code }) => {
                debug!("Client [ID {id}] Exiting with parse code {code}");
            }
            Err(e) => error!("Client [ID {id}] Error handling connection: {e}"),
        }
    }

    async fn converse<S>(&self, conn: &mut Connection<S>) -> Result<HandlerOutcome, Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let Some(data) = conn.read_once(self.read_buffer_size).await? else {
            return Ok(HandlerOutcome::PeerClosed);
        };
        let text = std::str::from_utf8(&data)?;

        let result = self.parser.parse(text);
        match &result {
            Ok(request) => match request.to_json() {
                Ok(json) => debug!("Client [ID {id}] Parsed request {json}", id = conn.id()),
                Err(e) => debug!("Client [ID {id}] Parsed request ({e})", id = conn.id()),
            },
            Err(e) => debug!("Client [ID {id}] Rejected request: {e}", id = conn.id()),
        }

        let response = DiagnosticResponse::for_result(&result);
        conn.write(&response.to_bytes()).await?;
        Ok(HandlerOutcome::Responded {
            code: response.code,
        })
    }
}
