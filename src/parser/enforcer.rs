//! Request validation policy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::parser::error::ParseError;

/// Default maximum number of header lines.
pub const DEFAULT_HEADER_LIMIT: usize = 64;

/// The rules a request must satisfy to be accepted.
///
/// Rules are plain data so they can be loaded from a config file. Missing
/// fields fall back to the defaults: `GET`/`POST`, targets `/` and `/ifttt`,
/// version `1.1` and a 64 line header limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnforcerRules {
    /// Header lines allowed before the blank line.
    pub header_limit: usize,
    /// Allowed methods, matched exactly and case-sensitively.
    pub allowed_methods: HashSet<String>,
    /// Allowed targets, matched exactly.
    pub allowed_targets: HashSet<String>,
    /// Allowed numeric versions.
    pub allowed_versions: Vec<f64>,
}

impl Default for EnforcerRules {
    fn default() -> Self {
        Self {
            header_limit: DEFAULT_HEADER_LIMIT,
            allowed_methods: ["GET", "POST"].into_iter().map(String::from).collect(),
            allowed_targets: ["/", "/ifttt"].into_iter().map(String::from).collect(),
            allowed_versions: vec![1.1],
        }
    }
}

impl EnforcerRules {
    /// Replace the allowed methods.
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the allowed targets.
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the allowed versions.
    pub fn with_versions(mut self, versions: impl IntoIterator<Item = f64>) -> Self {
        self.allowed_versions = versions.into_iter().collect();
        self
    }

    /// Set the header limit.
    pub fn with_header_limit(mut self, header_limit: usize) -> Self {
        self.header_limit = header_limit;
        self
    }
}

/// Applies an immutable [`EnforcerRules`] to the pieces of a request line.
#[derive(Debug, Clone, Default)]
pub struct Enforcer {
    rules: EnforcerRules,
}

impl Enforcer {
    /// Create an enforcer for the given rules.
    pub fn new(rules: EnforcerRules) -> Self {
        Self { rules }
    }

    /// The rules this enforcer applies.
    pub fn rules(&self) -> &EnforcerRules {
        &self.rules
    }

    /// The maximum number of header lines.
    pub fn header_limit(&self) -> usize {
        self.rules.header_limit
    }

    /// Accepts `method` iff it is in the allowed set.
    pub fn validate_method(&self, method: &str) -> Result<(), ParseError> {
        if self.rules.allowed_methods.contains(method) {
            Ok(())
        } else {
            Err(ParseError::BadMethod)
        }
    }

    /// Accepts `target` iff it is in the allowed set. No prefix or pattern
    /// matching is done.
    pub fn validate_target(&self, target: &str) -> Result<(), ParseError> {
        if self.rules.allowed_targets.contains(target) {
            Ok(())
        } else {
            Err(ParseError::BadTarget)
        }
    }

    /// Accepts `version` (the text after `HTTP/`) iff it parses as a decimal
    /// number that is in the allowed set.
    pub fn validate_version(&self, version: &str) -> Result<(), ParseError> {
        let version: f64 = version.parse().map_err(|_| ParseError::BadVersion)?;
        // equal text always parses to the same f64
        let allowed = self.rules.allowed_versions.iter().any(|v| *v == version);
        if allowed {
            Ok(())
        } else {
            Err(ParseError::BadVersion)
        }
    }
}
