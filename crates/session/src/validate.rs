//! Session-integrity validation.

use serde::Serialize;

use crate::{Identity, Profile};

/// Result of checking one identity/profile snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionIntegrity {
    /// Identity and profile are both present and refer to the same user.
    Ok,

    /// Identity and profile are both present but refer to **different**
    /// users. This is the highest-severity condition in the engine: a
    /// corrupted or stale session must short-circuit every other rule.
    Mismatch,

    /// One side is missing (or the identity is not authenticated). Expected
    /// while the collaborators are still loading, or before login.
    Incomplete,
}

/// Deterministically validate a session snapshot.
///
/// Whenever identity and profile are both present their user ids are
/// compared, authenticated or not: `authenticated == false` is a present
/// state, and a present identity that disagrees with the profile is a
/// corrupted session. Only a matching (or absent) pair can degrade to
/// `Incomplete` for lack of authentication.
pub fn validate(identity: Option<&Identity>, profile: Option<&Profile>) -> SessionIntegrity {
    match (identity, profile) {
        (Some(identity), Some(profile)) if profile.user_id != identity.id => {
            SessionIntegrity::Mismatch
        }
        (Some(identity), Some(_)) if identity.authenticated => SessionIntegrity::Ok,
        _ => SessionIntegrity::Incomplete,
    }
}
