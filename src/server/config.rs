//! Server configuration.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parser::EnforcerRules;
use crate::server::error::Error;

/// Default port the server binds to.
pub const DEFAULT_PORT: u16 = 13650;
/// Default size of the single read performed per connection.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// The IP family of a listening socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    #[serde(rename = "ipv4")]
    Ipv4,
    #[serde(rename = "ipv6")]
    Ipv6,
}

impl AddressFamily {
    /// Both families, IPv4 first.
    pub const ALL: [AddressFamily; 2] = [AddressFamily::Ipv4, AddressFamily::Ipv6];

    /// Whether `addr` belongs to this family.
    pub fn matches(self, addr: &std::net::SocketAddr) -> bool {
        match self {
            AddressFamily::Ipv4 => addr.is_ipv4(),
            AddressFamily::Ipv6 => addr.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// Number of accepter tasks per address family. A family with a count of
/// zero is not bound at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccepterCounts {
    pub ipv4: usize,
    pub ipv6: usize,
}

impl Default for AccepterCounts {
    fn default() -> Self {
        Self { ipv4: 1, ipv6: 1 }
    }
}

impl AccepterCounts {
    /// The count for `family`.
    pub fn get(&self, family: AddressFamily) -> usize {
        match family {
            AddressFamily::Ipv4 => self.ipv4,
            AddressFamily::Ipv6 => self.ipv6,
        }
    }

    /// Total accepters across both families.
    pub fn total(&self) -> usize {
        self.ipv4 + self.ipv6
    }
}

// Parses the command line form "<n4>,<n6>"
impl FromStr for AccepterCounts {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAccepters(s.to_string());
        let (ipv4, ipv6) = s.split_once(',').ok_or_else(invalid)?;
        Ok(Self {
            ipv4: ipv4.trim().parse().map_err(|_| invalid())?,
            ipv6: ipv6.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for AccepterCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.ipv4, self.ipv6)
    }
}

/// Where and how many ways to listen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host name or literal address, resolved once per family. Defaults to
    /// the machine's host name.
    pub host: String,
    /// The port to bind on every family.
    pub port: u16,
    /// Accepter tasks per family.
    pub accepters: AccepterCounts,
}

/// The machine's own host name, or `localhost` if it cannot be read.
pub fn local_host_name() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "localhost".to_string())
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: local_host_name(),
            port: DEFAULT_PORT,
            accepters: AccepterCounts::default(),
        }
    }
}

impl ListenerConfig {
    /// The families with at least one accepter.
    pub fn families(&self) -> impl Iterator<Item = AddressFamily> + '_ {
        AddressFamily::ALL
            .into_iter()
            .filter(move |family| self.accepters.get(*family) > 0)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening sockets and accepters.
    pub listener: ListenerConfig,
    /// The size of the single read done on each connection.
    pub read_buffer_size: usize,
    /// Upper bound on connections being handled at once, `None` for no bound.
    pub max_connections: Option<usize>,
    /// Request validation rules.
    pub rules: EnforcerRules,
    /// Log at debug level.
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_connections: None,
            rules: EnforcerRules::default(),
            verbose: false,
        }
    }
}

impl ServerConfig {
    /// Read a configuration from JSON text. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
