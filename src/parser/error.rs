//! Error types for the HTTP request parser.

use thiserror::Error;

/// Reasons a request can be rejected by the parser.
///
/// Each variant carries a fixed integer code that is reported back to the
/// client. Code `0` is reserved for a successful parse and has no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseError {
    /// The request line is missing fields or is otherwise unreadable.
    #[error("Malformed request")]
    Malformed = 1,

    /// The request method is not in the allowed set.
    #[error("Method not allowed")]
    BadMethod = 2,

    /// The request target is not in the allowed set.
    #[error("Target not allowed")]
    BadTarget = 3,

    /// The version is not a number, or not an allowed one.
    #[error("Unsupported HTTP version")]
    BadVersion = 4,

    /// The header section reached the configured header limit.
    #[error("Request too long")]
    RequestTooLong = 5,
}

impl ParseError {
    /// Wire code of a successful parse.
    pub const SUCCESS_CODE: u8 = 0;

    /// The integer code reported to the client for this error.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Maps a parse outcome to its wire code, `0` for success.
    pub fn code_of<T>(result: &Result<T, ParseError>) -> u8 {
        match result {
            Ok(_) => Self::SUCCESS_CODE,
            Err(e) => e.code(),
        }
    }
}
