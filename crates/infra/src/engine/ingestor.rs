//! Interior event ingestion pipeline.
//!
//! One call per raw reader event: validate, resolve, durably record, then
//! delegate to the tag and inventory ledgers. The event record from step 3 is
//! the source of truth even when a later step refuses to apply.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

use stockgate_core::{Actor, DomainError, EventId, ItemId, TagId, TenantId};
use stockgate_events::{EventKind, EventSource, RfidEvent};

use crate::stores::{EventLog, InventoryStore, StoreError, TagLedger};

/// A raw reader event as the hardware boundary delivers it.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub tag_id: String,
    pub event_type: String,
    pub location: Option<String>,
    pub delta: Option<i64>,
    /// Device clock; devices buffer offline, so this may lag ingestion.
    pub observed_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
    /// Explicit item resolution; takes precedence over the tag binding.
    pub item_id: Option<ItemId>,
    pub raw_payload: Option<String>,
    pub actor: Actor,
}

/// What one ingest call did.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub event: RfidEvent,
    /// False when the tag resolved to no item; the event is still recorded
    /// and is not reprocessed retroactively once a binding appears.
    pub processed: bool,
    /// Whether any movement-log entry was produced.
    pub wrote_log: bool,
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed input, rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested delta would drive quantity negative. The event is
    /// already recorded; only the inventory mutation was refused.
    #[error("insufficient stock: have {available}, requested delta {requested}")]
    InsufficientStock {
        available: i64,
        requested: i64,
        recorded_event: EventId,
    },

    /// A store write failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<DomainError> for IngestError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                IngestError::Validation(msg)
            }
            other => IngestError::Store(StoreError::Domain(other)),
        }
    }
}

/// Validates and idempotently records each raw reader event, resolves it to a
/// known item, and delegates to the inventory and tag ledgers.
///
/// Deliberately no content-hash deduplication: a second identical read
/// re-applies its delta (a tag that moved twice produces two identical
/// events, both legitimate). Exactly-once discipline exists only where it
/// matters, in the gate path.
pub struct EventIngestor {
    tags: Arc<dyn TagLedger>,
    inventory: Arc<dyn InventoryStore>,
    events: Arc<dyn EventLog>,
}

impl EventIngestor {
    pub fn new(
        tags: Arc<dyn TagLedger>,
        inventory: Arc<dyn InventoryStore>,
        events: Arc<dyn EventLog>,
    ) -> Self {
        Self {
            tags,
            inventory,
            events,
        }
    }

    pub fn ingest(
        &self,
        tenant_id: TenantId,
        request: IngestRequest,
    ) -> Result<IngestOutcome, IngestError> {
        // 1. Validate before any write.
        let tag_id = TagId::new(request.tag_id.clone())?;
        let kind = EventKind::parse(&request.event_type, request.delta)?;

        // 2. Resolve: explicit item id (verified in tenant scope) wins over
        // the tag binding. Resolution failure is not an error.
        let resolved = self.resolve_item(tenant_id, &tag_id, request.item_id)?;

        // 3. Record the event unconditionally; this row is the source of
        // truth regardless of what happens downstream.
        let now = Utc::now();
        let event = RfidEvent {
            id: EventId::new(),
            tenant_id,
            tag_id: tag_id.clone(),
            kind,
            item_id: resolved,
            location: request.location.clone(),
            observed_at: request.observed_at.unwrap_or(now),
            ingested_at: now,
            source: request
                .source
                .map(EventSource::new)
                .unwrap_or_else(EventSource::unknown),
            raw_payload: request.raw_payload,
        };
        self.events
            .append(event.clone())
            .map_err(IngestError::Store)?;

        let Some(item_id) = resolved else {
            warn!(
                tenant_id = %tenant_id,
                tag_id = %tag_id,
                event_id = %event.id,
                "event from unbound tag recorded but not processed"
            );
            return Ok(IngestOutcome {
                event,
                processed: false,
                wrote_log: false,
            });
        };

        // 4. Location bookkeeping: last-seen always, movement entry only on
        // an actual change.
        let mut wrote_log = false;
        if let Some(location) = request.location.as_deref() {
            wrote_log |=
                self.track_location(tenant_id, &tag_id, item_id, location, request.actor, &event)?;
        } else {
            self.touch_non_fatal(tenant_id, &tag_id, None, event.ingested_at);
        }

        // 5. Quantity adjustment; InsufficientStock fails the call while the
        // event from step 3 stays recorded.
        if let Some(delta) = kind.delta() {
            if delta != 0 {
                match self.inventory.adjust_quantity(
                    tenant_id,
                    item_id,
                    delta,
                    "rfid quantity event",
                    request.actor,
                    Some(event.id),
                    event.ingested_at,
                ) {
                    Ok(_) => wrote_log = true,
                    Err(StoreError::Domain(DomainError::InsufficientStock {
                        available,
                        requested,
                    })) => {
                        return Err(IngestError::InsufficientStock {
                            available,
                            requested,
                            recorded_event: event.id,
                        });
                    }
                    Err(e) => return Err(IngestError::Store(e)),
                }
            }
        }

        Ok(IngestOutcome {
            event,
            processed: true,
            wrote_log,
        })
    }

    fn resolve_item(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        explicit: Option<ItemId>,
    ) -> Result<Option<ItemId>, IngestError> {
        if let Some(item_id) = explicit {
            // Verify tenant scope; an unknown explicit id degrades to
            // unresolved rather than failing the ingest.
            match self.inventory.get(tenant_id, item_id) {
                Ok(Some(_)) => {
                    if let Ok(Some(bound)) = self.tags.resolve_item(tenant_id, tag_id) {
                        if bound != item_id {
                            warn!(
                                tenant_id = %tenant_id,
                                tag_id = %tag_id,
                                explicit_item = %item_id,
                                bound_item = %bound,
                                "explicit item id overrides a different tag binding"
                            );
                        }
                    }
                    return Ok(Some(item_id));
                }
                Ok(None) => {
                    warn!(
                        tenant_id = %tenant_id,
                        tag_id = %tag_id,
                        item_id = %item_id,
                        "explicit item id not found in tenant scope; treating as unresolved"
                    );
                    return Ok(None);
                }
                Err(e) => return Err(IngestError::Store(e)),
            }
        }
        self.tags
            .resolve_item(tenant_id, tag_id)
            .map_err(IngestError::Store)
    }

    /// Returns whether a location-update movement entry was written.
    #[allow(clippy::too_many_arguments)]
    fn track_location(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        item_id: ItemId,
        location: &str,
        actor: Actor,
        event: &RfidEvent,
    ) -> Result<bool, IngestError> {
        // Without a binding row nothing persists a last-known location, so a
        // movement entry here would repeat on every identical read. The
        // location stays on the recorded event.
        let Some(binding) = self
            .tags
            .get(tenant_id, tag_id)
            .map_err(IngestError::Store)?
        else {
            return Ok(false);
        };

        let moved = binding.last_location.as_deref() != Some(location);
        self.touch_non_fatal(tenant_id, tag_id, Some(location), event.ingested_at);
        if !moved {
            return Ok(false);
        }

        self.inventory
            .log_location_update(
                tenant_id,
                item_id,
                "location update",
                actor,
                Some(event.id),
                event.ingested_at,
            )
            .map_err(IngestError::Store)?;
        Ok(true)
    }

    /// Last-seen writes are independent appends; a conflict from a
    /// concurrent bind is non-fatal and just logged.
    fn touch_non_fatal(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        location: Option<&str>,
        at: DateTime<Utc>,
    ) {
        if let Err(e) = self.tags.touch(tenant_id, tag_id, location, at) {
            warn!(
                tenant_id = %tenant_id,
                tag_id = %tag_id,
                error = %e,
                "tag ledger touch failed; continuing"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{
        EventLog, InMemoryEventLog, InMemoryInventoryStore, InMemoryTagLedger, InventoryStore,
        TagLedger,
    };
    use stockgate_inventory::{InventoryRecord, MovementAction};

    struct Fixture {
        tags: Arc<InMemoryTagLedger>,
        inventory: Arc<InMemoryInventoryStore>,
        events: Arc<InMemoryEventLog>,
        ingestor: EventIngestor,
        tenant: TenantId,
    }

    fn fixture() -> Fixture {
        let tags = Arc::new(InMemoryTagLedger::new());
        let inventory = Arc::new(InMemoryInventoryStore::new());
        let events = Arc::new(InMemoryEventLog::new());
        let ingestor = EventIngestor::new(tags.clone(), inventory.clone(), events.clone());
        Fixture {
            tags,
            inventory,
            events,
            ingestor,
            tenant: TenantId::new(),
        }
    }

    fn seed_item(fx: &Fixture, quantity: i64) -> ItemId {
        let item_id = ItemId::new();
        fx.inventory
            .create(
                InventoryRecord::new(fx.tenant, item_id, "widget", quantity, 5, Utc::now())
                    .unwrap(),
            )
            .unwrap();
        item_id
    }

    fn bind(fx: &Fixture, tag: &str, item_id: ItemId, location: &str) {
        fx.tags
            .bind(fx.tenant, TagId::new(tag).unwrap(), item_id, location, Utc::now())
            .unwrap();
    }

    fn request(tag: &str, event_type: &str) -> IngestRequest {
        IngestRequest {
            tag_id: tag.to_string(),
            event_type: event_type.to_string(),
            location: None,
            delta: None,
            observed_at: None,
            source: Some("fixed-reader-1".to_string()),
            item_id: None,
            raw_payload: None,
            actor: Actor::Rfid,
        }
    }

    #[test]
    fn rejects_malformed_input_before_any_write() {
        let fx = fixture();

        let err = fx.ingestor.ingest(fx.tenant, request("", "scan")).unwrap_err();
        assert!(matches!(err, IngestError::Validation(_)));

        let err = fx.ingestor.ingest(fx.tenant, request("E1", "teleport")).unwrap_err();
        assert!(matches!(err, IngestError::Validation(_)));

        assert!(fx.events.list(fx.tenant, None).unwrap().is_empty());
    }

    #[test]
    fn unbound_tag_is_recorded_but_not_processed() {
        let fx = fixture();

        let outcome = fx.ingestor.ingest(fx.tenant, request("GHOST", "scan")).unwrap();
        assert!(!outcome.processed);
        assert!(!outcome.wrote_log);

        let recorded = fx.events.list(fx.tenant, None).unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].item_id, None);
    }

    #[test]
    fn quantity_event_adjusts_and_logs_once() {
        let fx = fixture();
        let item = seed_item(&fx, 10);
        bind(&fx, "E1", item, "AISLE_4");

        let mut req = request("E1", "quantity");
        req.delta = Some(-3);
        let outcome = fx.ingestor.ingest(fx.tenant, req).unwrap();
        assert!(outcome.processed);
        assert!(outcome.wrote_log);

        let record = fx.inventory.get(fx.tenant, item).unwrap().unwrap();
        assert_eq!(record.quantity, 7);

        let log = fx.inventory.movement_log(fx.tenant, item).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].delta, -3);
        assert_eq!(log[0].causing_event, Some(outcome.event.id));
    }

    #[test]
    fn insufficient_stock_keeps_the_event_recorded() {
        let fx = fixture();
        let item = seed_item(&fx, 7);
        bind(&fx, "E1", item, "AISLE_4");

        let mut req = request("E1", "quantity");
        req.delta = Some(-20);
        let err = fx.ingestor.ingest(fx.tenant, req).unwrap_err();

        let IngestError::InsufficientStock {
            available,
            requested,
            recorded_event,
        } = err
        else {
            panic!("expected InsufficientStock, got {err:?}");
        };
        assert_eq!(available, 7);
        assert_eq!(requested, -20);

        // Event durable, inventory untouched.
        assert!(fx.events.get(fx.tenant, recorded_event).unwrap().is_some());
        assert_eq!(fx.inventory.get(fx.tenant, item).unwrap().unwrap().quantity, 7);
    }

    #[test]
    fn location_change_writes_a_zero_delta_entry() {
        let fx = fixture();
        let item = seed_item(&fx, 10);
        bind(&fx, "E1", item, "AISLE_4");

        let mut req = request("E1", "move");
        req.location = Some("DOCK_2".to_string());
        let outcome = fx.ingestor.ingest(fx.tenant, req).unwrap();
        assert!(outcome.wrote_log);

        let log = fx.inventory.movement_log(fx.tenant, item).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, MovementAction::LocationUpdated);
        assert_eq!(log[0].delta, 0);

        let binding = fx.tags.get(fx.tenant, &TagId::new("E1").unwrap()).unwrap().unwrap();
        assert_eq!(binding.last_location.as_deref(), Some("DOCK_2"));
    }

    #[test]
    fn unchanged_location_produces_no_entry() {
        let fx = fixture();
        let item = seed_item(&fx, 10);
        bind(&fx, "E1", item, "AISLE_4");

        let mut req = request("E1", "move");
        req.location = Some("AISLE_4".to_string());
        let outcome = fx.ingestor.ingest(fx.tenant, req).unwrap();
        assert!(outcome.processed);
        assert!(!outcome.wrote_log);
        assert!(fx.inventory.movement_log(fx.tenant, item).unwrap().is_empty());
    }

    #[test]
    fn duplicate_reads_re_apply_their_delta() {
        let fx = fixture();
        let item = seed_item(&fx, 10);
        bind(&fx, "E1", item, "AISLE_4");

        let mut req = request("E1", "quantity");
        req.delta = Some(-2);
        fx.ingestor.ingest(fx.tenant, req.clone()).unwrap();
        fx.ingestor.ingest(fx.tenant, req).unwrap();

        // No content-hash dedup: two identical reads, two applications.
        assert_eq!(fx.inventory.get(fx.tenant, item).unwrap().unwrap().quantity, 6);
        assert_eq!(fx.inventory.movement_log(fx.tenant, item).unwrap().len(), 2);
    }

    #[test]
    fn explicit_item_id_overrides_the_binding() {
        let fx = fixture();
        let bound = seed_item(&fx, 10);
        let explicit = seed_item(&fx, 3);
        bind(&fx, "E1", bound, "AISLE_4");

        let mut req = request("E1", "quantity");
        req.delta = Some(-1);
        req.item_id = Some(explicit);
        fx.ingestor.ingest(fx.tenant, req).unwrap();

        assert_eq!(fx.inventory.get(fx.tenant, explicit).unwrap().unwrap().quantity, 2);
        assert_eq!(fx.inventory.get(fx.tenant, bound).unwrap().unwrap().quantity, 10);
    }

    #[test]
    fn explicit_item_on_unbound_tag_does_not_accrete_location_entries() {
        let fx = fixture();
        let item = seed_item(&fx, 10);

        let mut req = request("LOOSE", "move");
        req.location = Some("DOCK_2".to_string());
        req.item_id = Some(item);

        let first = fx.ingestor.ingest(fx.tenant, req.clone()).unwrap();
        let second = fx.ingestor.ingest(fx.tenant, req).unwrap();
        assert!(first.processed && second.processed);
        assert!(!first.wrote_log && !second.wrote_log);

        // No binding row to compare against: the location lives on the
        // recorded events, not in an ever-growing movement log.
        assert!(fx.inventory.movement_log(fx.tenant, item).unwrap().is_empty());
        assert_eq!(fx.events.list(fx.tenant, None).unwrap().len(), 2);
    }

    #[test]
    fn explicit_item_id_outside_tenant_scope_degrades_to_unresolved() {
        let fx = fixture();
        let other_tenant_item = ItemId::new();

        let mut req = request("E1", "scan");
        req.item_id = Some(other_tenant_item);
        let outcome = fx.ingestor.ingest(fx.tenant, req).unwrap();
        assert!(!outcome.processed);
        assert_eq!(fx.events.list(fx.tenant, None).unwrap().len(), 1);
    }
}
