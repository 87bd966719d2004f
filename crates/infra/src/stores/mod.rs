//! Store traits + in-memory implementations.
//!
//! Each trait is the single write path for its collection; tenant id leads
//! every lookup. In-memory implementations use `RwLock`-guarded maps like the
//! rest of the dev/test infrastructure; persistent backends implement the
//! same traits.

use thiserror::Error;

use stockgate_core::DomainError;

pub mod alert_sink;
pub mod authorization_registry;
pub mod event_log;
pub mod inventory;
pub mod tag_ledger;

pub use alert_sink::{AlertSink, InMemoryAlertSink};
pub use authorization_registry::{
    AuthorizationRegistry, InMemoryAuthorizationRegistry, IssueBatch,
};
pub use event_log::{EventLog, InMemoryEventLog};
pub use inventory::{InMemoryInventoryStore, InventoryStore};
pub use tag_ledger::{InMemoryTagLedger, TagLedger};

/// Failure surfaced by a store implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or misbehaved.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backing store did not answer within the caller's budget.
    ///
    /// Only the gate path imposes a budget; it treats this as a store
    /// failure and fails closed, never as a business outcome.
    #[error("store timed out")]
    Timeout,

    /// Deterministic domain failure raised at the store boundary
    /// (insufficient stock, not-found, duplicate live binding).
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    /// Map a poisoned lock to an unavailable store.
    pub(crate) fn poisoned() -> Self {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}
