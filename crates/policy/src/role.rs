use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier assigned to a user's profile.
///
/// Roles are intentionally opaque strings at this layer; the set of valid
/// roles is whatever the [`PolicyStore`](crate::PolicyStore) was built with.
/// A role that is not in the store is an explicit deny-all case for the
/// evaluator, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
