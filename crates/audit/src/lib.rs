//! `routegate-audit` — decision audit trail and denial escalation.
//!
//! Recording is fire-and-forget: nothing in this crate may block or fail the
//! evaluation path. Store and sink failures are logged and swallowed; denial
//! alerts are handed to a background dispatcher over a channel.

pub mod alert;
pub mod dispatch;
pub mod logger;
pub mod record;
pub mod store;

pub use alert::{Alert, AlertSink, AlertSinkError, InMemoryAlertSink};
pub use dispatch::{AlertDispatcher, AlertDispatcherConfig, AlertDispatcherHandle, DispatcherStats};
pub use logger::AuditLogger;
pub use record::{AuditOutcome, AuditRecord};
pub use store::{AuditStore, AuditStoreError, InMemoryAuditStore};
