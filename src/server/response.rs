//! The diagnostic response written back to every client.

use std::fmt;

use crate::parser::ParseError;

/// Status line sent on every response, whatever the parse outcome.
pub const STATUS_LINE: &str = "HTTP 200 OK";

/// A minimal response reporting the parse outcome code.
///
/// This is not a conformant HTTP response: it is a fixed status line, a blank
/// line, then `Parse Error: <code>` with `0` meaning the request was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticResponse {
    /// The parse outcome code.
    pub code: u8,
}

impl DiagnosticResponse {
    /// Build the response for a parse outcome.
    pub fn for_result<T>(result: &Result<T, ParseError>) -> Self {
        Self {
            code: ParseError::code_of(result),
        }
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for DiagnosticResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{STATUS_LINE}\r\n\r\nParse Error: {}", self.code)
    }
}
