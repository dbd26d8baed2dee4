use serde::Serialize;

use routegate_core::PathPrefix;

/// Why a request was denied.
///
/// Denials are routine control flow for the engine; none of these are
/// errors that propagate to the caller. Each maps to a redirect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// No authenticated session on a non-public path. Recoverable: redirect
    /// to login.
    NotAuthenticated,

    /// The profile's role is not in the policy table. Configuration drift;
    /// redirect to a generic safe landing and monitor.
    InvalidRole,

    /// The role's policy does not allow this path. Expected and routine;
    /// redirect to the role's own default route.
    UnauthorizedPath,

    /// Identity and profile refer to different users. Fatal: forced logout,
    /// overrides every other rule including public-route membership.
    SessionIntegrityViolation,
}

impl core::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidRole => "INVALID_ROLE",
            Self::UnauthorizedPath => "UNAUTHORIZED_PATH",
            Self::SessionIntegrityViolation => "SESSION_INTEGRITY_VIOLATION",
        };
        f.write_str(s)
    }
}

/// A denial verdict: the reason plus where to send the caller instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub reason: DenyReason,
    pub redirect: PathPrefix,
}

/// The engine's verdict for one [`AccessRequest`](crate::AccessRequest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessDecision {
    /// Inputs are still loading; no verdict yet. Callers render a loading
    /// state, write no audit record, and re-evaluate once loading completes.
    Pending,

    Allow,

    Deny(Denial),
}

impl AccessDecision {
    pub fn deny(reason: DenyReason, redirect: PathPrefix) -> Self {
        Self::Deny(Denial { reason, redirect })
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}
