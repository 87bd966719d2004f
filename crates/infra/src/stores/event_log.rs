use std::collections::HashMap;
use std::sync::RwLock;

use stockgate_core::{EventId, TagId, TenantId};
use stockgate_events::RfidEvent;

use super::StoreError;

/// Append-only record of every read the hardware reported.
///
/// The recorded event is the source of truth even when downstream processing
/// fails; nothing here is ever mutated or deleted.
pub trait EventLog: Send + Sync {
    fn append(&self, event: RfidEvent) -> Result<(), StoreError>;

    fn get(&self, tenant_id: TenantId, event_id: EventId) -> Result<Option<RfidEvent>, StoreError>;

    /// Events for a tenant in ingestion order, optionally filtered by tag.
    fn list(&self, tenant_id: TenantId, tag_id: Option<&TagId>)
        -> Result<Vec<RfidEvent>, StoreError>;
}

/// In-memory event log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<HashMap<TenantId, Vec<RfidEvent>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, event: RfidEvent) -> Result<(), StoreError> {
        let mut map = self.events.write().map_err(|_| StoreError::poisoned())?;
        map.entry(event.tenant_id).or_default().push(event);
        Ok(())
    }

    fn get(
        &self,
        tenant_id: TenantId,
        event_id: EventId,
    ) -> Result<Option<RfidEvent>, StoreError> {
        let map = self.events.read().map_err(|_| StoreError::poisoned())?;
        Ok(map
            .get(&tenant_id)
            .and_then(|events| events.iter().find(|e| e.id == event_id))
            .cloned())
    }

    fn list(
        &self,
        tenant_id: TenantId,
        tag_id: Option<&TagId>,
    ) -> Result<Vec<RfidEvent>, StoreError> {
        let map = self.events.read().map_err(|_| StoreError::poisoned())?;
        let events = map.get(&tenant_id).cloned().unwrap_or_default();
        Ok(match tag_id {
            Some(tag) => events.into_iter().filter(|e| &e.tag_id == tag).collect(),
            None => events,
        })
    }
}
