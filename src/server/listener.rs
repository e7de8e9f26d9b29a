//! Dual-stack listening sockets.

use std::net::SocketAddr;

use log::{debug, info};
use tokio::net::{lookup_host, TcpListener, TcpSocket};

use crate::server::config::{AddressFamily, ListenerConfig};
use crate::server::connection::Connection;
use crate::server::error::Error;

/// Listen queue depth of every socket.
pub const BACKLOG: u32 = 5;

/// One listening socket per enabled address family, all on the same port.
///
/// With port `0` the first family bound picks an ephemeral port and the
/// other family is bound to that same port.
///
/// Accepting takes `&self`, so every accepter of a family shares the same
/// socket. Sockets close when the listener is dropped.
#[derive(Debug)]
pub struct DualStackListener {
    ipv4: Option<TcpListener>,
    ipv6: Option<TcpListener>,
}

impl DualStackListener {
    /// Bind every family with at least one accepter.
    ///
    /// Failing to bind any requested family fails the whole call; there is no
    /// partially bound listener.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, Error> {
        let mut listener = Self {
            ipv4: None,
            ipv6: None,
        };

        let mut port = config.port;
        for family in config.families() {
            let socket = Self::bind_family(&config.host, port, family).await?;
            if port == 0 {
                port = socket.local_addr()?.port();
            }
            match family {
                AddressFamily::Ipv4 => listener.ipv4 = Some(socket),
                AddressFamily::Ipv6 => listener.ipv6 = Some(socket),
            }
        }

        Ok(listener)
    }

    /// Resolve `host` and bind a socket to its first address of `family`.
    async fn bind_family(host: &str, port: u16, family: AddressFamily) -> Result<TcpListener, Error> {
        let addr = Self::resolve(host, port, family).await?;
        let bind_error = |source| Error::Bind { family, addr, source };

        let socket = match family {
            AddressFamily::Ipv4 => TcpSocket::new_v4(),
            AddressFamily::Ipv6 => TcpSocket::new_v6(),
        }
        .map_err(bind_error)?;
        socket.set_reuseaddr(true).map_err(bind_error)?;
        socket.bind(addr).map_err(bind_error)?;
        let listener = socket.listen(BACKLOG).map_err(bind_error)?;

        let local_addr = listener.local_addr().map_err(bind_error)?;
        info!("Bound {family} socket: {local_addr} to port {port}", port = local_addr.port());
        Ok(listener)
    }

    async fn resolve(host: &str, port: u16, family: AddressFamily) -> Result<SocketAddr, Error> {
        let mut addrs = lookup_host((host, port))
            .await
            .map_err(|source| Error::Resolve {
                host: host.to_string(),
                source,
            })?;

        addrs
            .find(|addr| family.matches(addr))
            .ok_or_else(|| Error::NoAddress {
                family,
                host: host.to_string(),
            })
    }

    fn socket(&self, family: AddressFamily) -> Result<&TcpListener, Error> {
        match family {
            AddressFamily::Ipv4 => self.ipv4.as_ref(),
            AddressFamily::Ipv6 => self.ipv6.as_ref(),
        }
        .ok_or(Error::FamilyNotBound(family))
    }

    /// Whether a socket is bound for `family`.
    pub fn is_bound(&self, family: AddressFamily) -> bool {
        self.socket(family).is_ok()
    }

    /// The address the `family` socket is bound to.
    pub fn local_addr(&self, family: AddressFamily) -> Result<SocketAddr, Error> {
        Ok(self.socket(family)?.local_addr()?)
    }

    /// Wait for the next peer on the `family` socket.
    ///
    /// This is cancel safe: dropping the future loses no connection.
    pub async fn accept(&self, family: AddressFamily) -> Result<Connection, Error> {
        let (stream, peer) = self.socket(family)?.accept().await?;
        let conn = Connection::new(stream, peer);
        debug!("Accepted client ({family}) at {peer} as [ID {id}]", id = conn.id());
        Ok(conn)
    }
}
