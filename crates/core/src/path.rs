//! Path prefix value object with boundary-safe matching.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A path prefix used for route matching.
///
/// A prefix matches a request path `p` iff `p == prefix` or `p` starts with
/// `prefix + "/"`. Matching is segment-boundary safe: `/auth` matches
/// `/auth/login` but never `/authorize`. The root prefix `"/"` matches only
/// `"/"` itself.
///
/// The same matching rule is used by every component that looks at paths
/// (route policies and the public-route registry), so allow/deny semantics
/// cannot drift between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathPrefix(Cow<'static, str>);

impl PathPrefix {
    /// Create a validated path prefix.
    ///
    /// Prefixes must be non-empty, start with `/`, and not end with a
    /// trailing `/` (except the root `"/"`). These are configuration values;
    /// a malformed prefix is a startup error, not a runtime condition.
    pub fn new(prefix: impl Into<Cow<'static, str>>) -> Result<Self, DomainError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(DomainError::validation("path prefix must not be empty"));
        }
        if !prefix.starts_with('/') {
            return Err(DomainError::validation(format!(
                "path prefix must start with '/': {prefix:?}"
            )));
        }
        if prefix.len() > 1 && prefix.ends_with('/') {
            return Err(DomainError::validation(format!(
                "path prefix must not end with '/': {prefix:?}"
            )));
        }
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Boundary-safe prefix match against a request path.
    pub fn matches(&self, path: &str) -> bool {
        let prefix = self.as_str();
        if path == prefix {
            return true;
        }
        match path.strip_prefix(prefix) {
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }
}

impl core::fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
