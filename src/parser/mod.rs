//! HTTP request parser module.
//!
//! Turns the text of an HTTP/1.1 request into a [`ParsedRequest`], checking
//! the request line against an [`Enforcer`] as it goes. Rejections are plain
//! [`ParseError`] values, not failures of the connection.

mod enforcer;
mod error;
mod request;
mod tests;

// Re-export public items
pub use enforcer::{Enforcer, EnforcerRules, DEFAULT_HEADER_LIMIT};
pub use error::ParseError;
pub use request::{parse_request, ParsedRequest, RequestParser};
