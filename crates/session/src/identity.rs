use serde::{Deserialize, Serialize};

use routegate_core::UserId;
use routegate_policy::Role;

/// Authentication-layer fact about the current user.
///
/// Supplied by the auth collaborator. "Absent/still loading" is a distinct
/// third state carried as `Option<Identity>` plus the loading flag on the
/// request; it is never collapsed into `authenticated = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub authenticated: bool,
}

impl Identity {
    pub fn authenticated(id: UserId) -> Self {
        Self {
            id,
            authenticated: true,
        }
    }
}

/// Application-layer fact about the current user.
///
/// Supplied by the profile-store collaborator; may lag behind [`Identity`]
/// while loading, which is why integrity is re-checked on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub role: Role,
}
