use chrono::{DateTime, Utc};
use serde::Serialize;

use routegate_core::UserId;
use routegate_engine::DenyReason;
use routegate_policy::Role;

/// Binary outcome recorded for one evaluation.
///
/// `Pending` decisions are not outcomes and are never recorded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    Allow,
    Deny,
}

/// One immutable entry in the access audit trail.
///
/// Append-only: records are never mutated or deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub identity_id: Option<UserId>,
    pub role: Option<Role>,
    pub path: String,
    pub outcome: AuditOutcome,
    pub reason: Option<DenyReason>,
}
