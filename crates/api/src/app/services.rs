use std::sync::Arc;
use std::time::Duration;

use stockgate_infra::{
    engine::{EventIngestor, GateDecisionEngine},
    stores::{
        AlertSink, AuthorizationRegistry, EventLog, InMemoryAlertSink,
        InMemoryAuthorizationRegistry, InMemoryEventLog, InMemoryInventoryStore,
        InMemoryTagLedger, InventoryStore, TagLedger,
    },
};

/// Shared service graph: store seams plus the two engines over them.
///
/// Handlers reach stores directly for the plain read/write endpoints and go
/// through the engines for ingestion and gate decisions.
pub struct AppServices {
    pub tags: Arc<dyn TagLedger>,
    pub inventory: Arc<dyn InventoryStore>,
    pub events: Arc<dyn EventLog>,
    pub registry: Arc<dyn AuthorizationRegistry>,
    pub alerts: Arc<dyn AlertSink>,
    pub ingestor: EventIngestor,
    pub gate: GateDecisionEngine,
}

/// In-memory wiring (dev/test). A persistent backend swaps in behind the
/// same trait seams.
pub fn build_services(decision_budget: Duration) -> AppServices {
    let tags: Arc<dyn TagLedger> = Arc::new(InMemoryTagLedger::new());
    let inventory: Arc<dyn InventoryStore> = Arc::new(InMemoryInventoryStore::new());
    let events: Arc<dyn EventLog> = Arc::new(InMemoryEventLog::new());
    let registry: Arc<dyn AuthorizationRegistry> = Arc::new(InMemoryAuthorizationRegistry::new());
    let alerts: Arc<dyn AlertSink> = Arc::new(InMemoryAlertSink::new());

    let ingestor = EventIngestor::new(tags.clone(), inventory.clone(), events.clone());
    let gate = GateDecisionEngine::new(
        registry.clone(),
        tags.clone(),
        inventory.clone(),
        events.clone(),
        alerts.clone(),
        decision_budget,
    );

    AppServices {
        tags,
        inventory,
        events,
        registry,
        alerts,
        ingestor,
        gate,
    }
}
