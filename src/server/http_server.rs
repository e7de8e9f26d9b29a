//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use tokio::signal;

use crate::server::accepter::AccepterPool;
use crate::server::config::{AddressFamily, ServerConfig};
use crate::server::error::Error;
use crate::server::handler::ConnectionHandler;
use crate::server::limit::ConnectionLimit;
use crate::server::listener::DualStackListener;
use crate::server::shutdown::ShutdownSignal;

/// A running server: the bound sockets plus their accepter tasks.
#[derive(Debug)]
pub struct HttpServer {
    config: ServerConfig,
    listener: Arc<DualStackListener>,
    accepters: AccepterPool,
    shutdown: ShutdownSignal,
    limit: ConnectionLimit,
}

impl HttpServer {
    /// Bind the configured families and start accepting.
    ///
    /// Any family that fails to bind fails the start; nothing keeps running.
    pub async fn start(config: ServerConfig) -> Result<Self, Error> {
        let listener = Arc::new(DualStackListener::bind(&config.listener).await?);

        let shutdown = ShutdownSignal::new();
        let limit = ConnectionLimit::from_max(config.max_connections);
        let handler = ConnectionHandler::from_config(&config);
        let accepters = AccepterPool::spawn(
            Arc::clone(&listener),
            config.listener.accepters,
            handler,
            limit.clone(),
            &shutdown,
        );

        Self::display_server_info(&config, &listener);

        Ok(Self {
            config,
            listener,
            accepters,
            shutdown,
            limit,
        })
    }

    fn display_server_info(config: &ServerConfig, listener: &DualStackListener) {
        for family in config.listener.families() {
            if let Ok(addr) = listener.local_addr(family) {
                info!(
                    "Server listening on {family} {addr} with {count} accepter(s)",
                    count = config.listener.accepters.get(family)
                );
            }
        }
        match config.max_connections {
            Some(max) => info!("Handling at most {max} connections at once"),
            None => info!("Handling connections without a concurrency limit"),
        }
    }

    /// The configuration the server was started with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The bound address for `family`.
    pub fn local_addr(&self, family: AddressFamily) -> Result<SocketAddr, Error> {
        self.listener.local_addr(family)
    }

    /// The `(id, family)` of every accepter.
    pub fn accepters(&self) -> Vec<(usize, AddressFamily)> {
        self.accepters.accepters()
    }

    /// Stop every accepter and close the listening sockets.
    ///
    /// Returns once all accepters have exited. Connections already handed to
    /// a handler are left to finish on their own.
    pub async fn shutdown(self) {
        info!("Shutting down server...");
        self.shutdown.trigger();
        self.limit.close();
        self.accepters.join().await;
        drop(self.listener);
        info!("Server shutdown complete");
    }

    /// Serve until Ctrl+C, then shut down.
    pub async fn run_until_ctrl_c(self) -> Result<(), Error> {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, initiating graceful shutdown");
        self.shutdown().await;
        Ok(())
    }
}
