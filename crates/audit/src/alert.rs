//! Denial escalation payload and sink abstraction.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use routegate_core::UserId;
use routegate_engine::DenyReason;
use routegate_policy::Role;

/// Escalation payload forwarded to the external alert sink on every denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub identity_id: Option<UserId>,
    pub role: Option<Role>,
    pub path: String,
    pub reason: DenyReason,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("alert sink delivery failed: {0}")]
pub struct AlertSinkError(pub String);

/// Best-effort channel to the external alerting collaborator (typically an
/// HTTP endpoint).
///
/// Delivery is asynchronous relative to the access decision and never
/// awaited by it; a failing sink can only cost alerts, never verdicts.
pub trait AlertSink: Send + Sync {
    fn deliver(&self, alert: &Alert) -> Result<(), AlertSinkError>;
}

/// In-memory alert sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAlertSink {
    alerts: Mutex<Vec<Alert>>,
}

impl InMemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl AlertSink for InMemoryAlertSink {
    fn deliver(&self, alert: &Alert) -> Result<(), AlertSinkError> {
        self.alerts
            .lock()
            .map_err(|_| AlertSinkError("alert sink lock poisoned".to_string()))?
            .push(alert.clone());
        Ok(())
    }
}
