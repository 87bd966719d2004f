//! `stockgate-infra` — durable-store seams and the two engines that
//! orchestrate them.
//!
//! The store traits (`TagLedger`, `InventoryStore`, `EventLog`,
//! `AuthorizationRegistry`, `AlertSink`) are the boundary where serialization
//! discipline lives: per-item version CAS on inventory, revoke-folded-into-
//! insert on the registry. The in-memory implementations back tests and dev;
//! a persistent backend plugs in behind the same traits.
//!
//! The engines are intentionally thin over those seams:
//! - [`engine::EventIngestor`] — validate, resolve, record, then delegate.
//! - [`engine::GateDecisionEngine`] — budget-bounded allow/deny, fail closed.

pub mod engine;
pub mod stores;


pub use engine::{
    EventIngestor, GateDecisionEngine, GateOutcome, GateRead, IngestError, IngestOutcome,
    IngestRequest,
};
pub use stores::{
    AlertSink, AuthorizationRegistry, EventLog, InMemoryAlertSink, InMemoryAuthorizationRegistry,
    InMemoryEventLog, InMemoryInventoryStore, InMemoryTagLedger, InventoryStore, IssueBatch,
    StoreError, TagLedger,
};
