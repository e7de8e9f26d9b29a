//! A dual-stack HTTP request intake library.
//!
//! This library accepts TCP connections on IPv4 and IPv6 at the same time,
//! hands each one to its own task, and parses what the client sent as an
//! HTTP/1.1 request checked against a configurable rule set.
//!
//! # Features
//!
//! - One listening socket per address family, on the same port
//! - Any number of accepter tasks per family
//! - One task per connection, optionally bounded by a connection limit
//! - A request parser with allow-lists for methods, targets and versions
//! - Immediate, cooperative shutdown
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use dualhttp_rs::parse_request;
//!
//! let request = parse_request("GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! assert_eq!(request.method, "GET");
//! assert_eq!(request.target, "/");
//! assert_eq!(request.version, 1.1);
//! assert_eq!(request.header("Host"), Some("example.com"));
//! assert_eq!(request.body, None);
//! ```
//!
//! ## Error handling
//!
//! ```
//! use dualhttp_rs::{parse_request, ParseError};
//!
//! match parse_request("PUT / HTTP/1.1\r\n\r\n") {
//!     Ok(_) => println!("Request parsed successfully"),
//!     Err(ParseError::BadMethod) => println!("Method not allowed"),
//!     Err(err) => println!("Rejected with code {}: {err}", err.code()),
//! }
//! ```
//!
//! ## Custom rules
//!
//! ```
//! use dualhttp_rs::{EnforcerRules, ParseError, RequestParser};
//!
//! let rules = EnforcerRules::default()
//!     .with_methods(["GET", "DELETE"])
//!     .with_targets(["/items"])
//!     .with_versions([1.0, 1.1]);
//! let parser = RequestParser::new(rules);
//!
//! assert!(parser.parse("DELETE /items HTTP/1.0\r\n\r\n").is_ok());
//! assert_eq!(parser.parse("GET / HTTP/1.1\r\n\r\n"), Err(ParseError::BadTarget));
//! ```
//!
//! ## Running the server
//!
//! ```no_run
//! use dualhttp_rs::{HttpServer, ServerConfig};
//!
//! # async fn run() -> Result<(), dualhttp_rs::ServerError> {
//! let server = HttpServer::start(ServerConfig::default()).await?;
//! server.run_until_ctrl_c().await?;
//! # Ok(())
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Enforcer, EnforcerRules, ParseError, ParsedRequest, RequestParser};
pub use server::{
    AccepterCounts, AddressFamily, ConnectionHandler, DiagnosticResponse, Error as ServerError,
    HttpServer, ListenerConfig, ServerConfig,
};
