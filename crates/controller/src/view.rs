use serde::Serialize;

use routegate_core::PathPrefix;
use routegate_engine::DenyReason;

/// What the shell should render for the current decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    /// Inputs still loading; render a spinner, perform no navigation.
    Loading,

    /// Access granted; render the protected content.
    Content,

    /// Access denied; render the violation explanation until the grace
    /// period elapses and the scheduled redirect fires.
    Violation {
        reason: DenyReason,
        redirect: PathPrefix,
    },
}
