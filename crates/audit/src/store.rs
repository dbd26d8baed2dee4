//! Audit-record persistence abstraction.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::AuditRecord;

#[derive(Debug, Error)]
pub enum AuditStoreError {
    /// Append failed due to internal lock poisoning.
    #[error("audit store lock poisoned")]
    Poisoned,

    /// Backend-specific append failure.
    #[error("audit store append failed: {0}")]
    Backend(String),
}

/// Append-only sink for audit records.
///
/// Implementations must be safe to call from the evaluation path: appends
/// should be cheap, and failures are the logger's problem (logged and
/// swallowed), never the caller's.
pub trait AuditStore: Send + Sync {
    fn append(&self, record: AuditRecord) -> Result<(), AuditStoreError>;
}

impl<S> AuditStore for Arc<S>
where
    S: AuditStore + ?Sized,
{
    fn append(&self, record: AuditRecord) -> Result<(), AuditStoreError> {
        (**self).append(record)
    }
}

/// In-memory audit store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, record: AuditRecord) -> Result<(), AuditStoreError> {
        self.records
            .lock()
            .map_err(|_| AuditStoreError::Poisoned)?
            .push(record);
        Ok(())
    }
}
