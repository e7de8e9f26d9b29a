//! HTTP request parsing and representation.

use std::collections::HashMap;

use serde::Serialize;

use crate::parser::enforcer::{Enforcer, EnforcerRules};
use crate::parser::error::ParseError;

/// Line delimiter of the request text.
const CRLF: &str = "\r\n";
/// Delimiter between a header name and its value.
const HEADER_DELIMITER: &str = ": ";
/// Prefix of the version field on the request line.
const VERSION_PREFIX: &str = "HTTP/";

/// A request that passed every rule of the enforcer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRequest {
    /// The request method, as sent
    pub method: String,
    /// The request target
    pub target: String,
    /// The numeric HTTP version, e.g. `1.1`
    pub version: f64,
    /// Header names (case preserved) to values; the last duplicate wins
    pub headers: HashMap<String, String>,
    /// The request body, never `Some("")`
    pub body: Option<String>,
}

impl ParsedRequest {
    /// Get a header value by its exact name.
    ///
    /// # Arguments
    ///
    /// * `name` - The header name, compared case-sensitively
    ///
    /// # Returns
    ///
    /// The header value, if it exists
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Serialize the request to JSON for diagnostics.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Turns request text into a [`ParsedRequest`] under a set of rules.
#[derive(Debug, Clone, Default)]
pub struct RequestParser {
    enforcer: Enforcer,
}

impl RequestParser {
    /// Create a parser that enforces `rules`.
    pub fn new(rules: EnforcerRules) -> Self {
        Self {
            enforcer: Enforcer::new(rules),
        }
    }

    /// The enforcer used by this parser.
    pub fn enforcer(&self) -> &Enforcer {
        &self.enforcer
    }

    /// Parse a complete request.
    ///
    /// The request line is validated field by field and parsing stops at the
    /// first rejected field. Header lines without `": "` are skipped but still
    /// count toward the header limit. Everything after the first blank line is
    /// concatenated, without line breaks, into the body.
    ///
    /// # Arguments
    ///
    /// * `text` - The request, already decoded from UTF-8
    ///
    /// # Returns
    ///
    /// The parsed request, or the first rule it broke
    pub fn parse(&self, text: &str) -> Result<ParsedRequest, ParseError> {
        let lines: Vec<&str> = text.split(CRLF).collect();
        let (request_line, rest) = lines.split_first().ok_or(ParseError::Malformed)?;

        // The method is checked before the other fields are looked at
        let mut fields = request_line.split(' ');
        let method = fields.next().ok_or(ParseError::Malformed)?.trim();
        self.enforcer.validate_method(method)?;

        let target = fields.next().ok_or(ParseError::Malformed)?.trim();
        self.enforcer.validate_target(target)?;

        let version_field = fields.next().ok_or(ParseError::Malformed)?.trim();
        let version_text = version_field
            .strip_prefix(VERSION_PREFIX)
            .unwrap_or(version_field);
        self.enforcer.validate_version(version_text)?;
        let version: f64 = version_text.parse().map_err(|_| ParseError::BadVersion)?;

        let (headers, blank_index) = self.parse_headers(rest)?;

        let body = match blank_index {
            Some(index) if index + 1 < rest.len() => {
                let body = rest[index + 1..].concat();
                (!body.is_empty()).then_some(body)
            }
            _ => None,
        };

        Ok(ParsedRequest {
            method: method.to_string(),
            target: target.to_string(),
            version,
            headers,
            body,
        })
    }

    /// Collect headers up to the first blank line, returning them with the
    /// index of that blank line within `lines`.
    fn parse_headers(
        &self,
        lines: &[&str],
    ) -> Result<(HashMap<String, String>, Option<usize>), ParseError> {
        let limit = self.enforcer.header_limit();
        let mut headers = HashMap::new();

        for (index, line) in lines.iter().enumerate() {
            // The limit is checked before the blank line
            if index >= limit {
                return Err(ParseError::RequestTooLong);
            }
            if line.is_empty() {
                return Ok((headers, Some(index)));
            }

            let mut pieces = line.split(HEADER_DELIMITER);
            if let (Some(name), Some(value)) = (pieces.next(), pieces.next()) {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        Ok((headers, None))
    }
}

/// Parse a request with the default [`EnforcerRules`].
///
/// # Arguments
///
/// * `text` - The request text
///
/// # Returns
///
/// The parsed request, or the error code explaining the rejection
pub fn parse_request(text: &str) -> Result<ParsedRequest, ParseError> {
    RequestParser::default().parse(text)
}
