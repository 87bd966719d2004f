use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use stockgate_core::{Actor, DomainError, EventId, ItemId, TenantId};
use stockgate_inventory::{
    plan_adjustment, Adjustment, InventoryRecord, MovementAction, MovementLogEntry,
};

use super::StoreError;

/// Durable, versioned quantity-per-item store with the movement log.
///
/// This layer is deliberately dumb and atomic: `adjust_quantity` writes the
/// new quantity, bumps the record version, and appends exactly one movement
/// entry in one atomic unit. Duplicate-event deduplication is the ingestor's
/// concern, not this layer's.
pub trait InventoryStore: Send + Sync {
    /// Insert a new record; `Conflict` if the item already exists.
    fn create(&self, record: InventoryRecord) -> Result<(), StoreError>;

    fn get(&self, tenant_id: TenantId, item_id: ItemId)
        -> Result<Option<InventoryRecord>, StoreError>;

    /// Apply a signed delta, failing closed on underflow.
    ///
    /// Delta 0 is a no-op that produces no movement entry (used for pure
    /// location updates through `log_location_update`).
    #[allow(clippy::too_many_arguments)]
    fn adjust_quantity(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        delta: i64,
        reason: &str,
        actor: Actor,
        causing_event: Option<EventId>,
        at: DateTime<Utc>,
    ) -> Result<Adjustment, StoreError>;

    /// Append a location-update movement entry (delta 0, quantity untouched).
    fn log_location_update(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        reason: &str,
        actor: Actor,
        causing_event: Option<EventId>,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Movement entries for one item, in admission order.
    fn movement_log(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
    ) -> Result<Vec<MovementLogEntry>, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<(TenantId, ItemId), InventoryRecord>,
    log: Vec<MovementLogEntry>,
}

/// In-memory inventory store for tests/dev.
///
/// One lock guards records and log together, so the quantity write and its
/// paired movement entry are a single atomic unit, and concurrent adjustments
/// to the same item are serialized here rather than by any caller-side lock.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn create(&self, record: InventoryRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let key = (record.tenant_id, record.item_id);
        if inner.records.contains_key(&key) {
            return Err(DomainError::conflict("item already exists").into());
        }
        inner.records.insert(key, record);
        Ok(())
    }

    fn get(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(inner.records.get(&(tenant_id, item_id)).cloned())
    }

    fn adjust_quantity(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        delta: i64,
        reason: &str,
        actor: Actor,
        causing_event: Option<EventId>,
        at: DateTime<Utc>,
    ) -> Result<Adjustment, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let record = inner
            .records
            .get(&(tenant_id, item_id))
            .ok_or(DomainError::NotFound)?;

        let adjustment = plan_adjustment(record.quantity, delta)?;

        if delta == 0 {
            // No-op: no write, no movement entry.
            return Ok(adjustment);
        }

        let entry = MovementLogEntry {
            item_id,
            tenant_id,
            action: MovementAction::QuantityAdjusted,
            delta,
            previous_quantity: adjustment.previous_quantity,
            new_quantity: adjustment.new_quantity,
            reason: reason.to_string(),
            actor,
            causing_event,
            at,
        };

        // Quantity write + version bump + log append under one write lock.
        let record = inner
            .records
            .get_mut(&(tenant_id, item_id))
            .ok_or(DomainError::NotFound)?;
        record.quantity = adjustment.new_quantity;
        record.version += 1;
        inner.log.push(entry);

        Ok(adjustment)
    }

    fn log_location_update(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        reason: &str,
        actor: Actor,
        causing_event: Option<EventId>,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let quantity = inner
            .records
            .get(&(tenant_id, item_id))
            .ok_or(DomainError::NotFound)?
            .quantity;

        inner.log.push(MovementLogEntry {
            item_id,
            tenant_id,
            action: MovementAction::LocationUpdated,
            delta: 0,
            previous_quantity: quantity,
            new_quantity: quantity,
            reason: reason.to_string(),
            actor,
            causing_event,
            at,
        });
        Ok(())
    }

    fn movement_log(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
    ) -> Result<Vec<MovementLogEntry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(inner
            .log
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.item_id == item_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(store: &InMemoryInventoryStore, tenant: TenantId, quantity: i64) -> ItemId {
        let item_id = ItemId::new();
        store
            .create(
                InventoryRecord::new(tenant, item_id, "widget", quantity, 5, Utc::now()).unwrap(),
            )
            .unwrap();
        item_id
    }

    #[test]
    fn adjustment_writes_quantity_and_one_entry() {
        let store = InMemoryInventoryStore::new();
        let tenant = TenantId::new();
        let item = seed(&store, tenant, 10);

        let adj = store
            .adjust_quantity(tenant, item, -3, "rfid quantity event", Actor::Rfid, None, Utc::now())
            .unwrap();
        assert_eq!(adj.previous_quantity, 10);
        assert_eq!(adj.new_quantity, 7);

        let record = store.get(tenant, item).unwrap().unwrap();
        assert_eq!(record.quantity, 7);
        assert_eq!(record.version, 1);

        let log = store.movement_log(tenant, item).unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].is_consistent());
        assert_eq!(log[0].delta, -3);
    }

    #[test]
    fn underflow_is_refused_without_any_write() {
        let store = InMemoryInventoryStore::new();
        let tenant = TenantId::new();
        let item = seed(&store, tenant, 7);

        let err = store
            .adjust_quantity(tenant, item, -20, "rfid quantity event", Actor::Rfid, None, Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Domain(DomainError::insufficient_stock(7, -20))
        );

        let record = store.get(tenant, item).unwrap().unwrap();
        assert_eq!(record.quantity, 7);
        assert_eq!(record.version, 0);
        assert!(store.movement_log(tenant, item).unwrap().is_empty());
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let store = InMemoryInventoryStore::new();
        let tenant = TenantId::new();
        let item = seed(&store, tenant, 4);

        let adj = store
            .adjust_quantity(tenant, item, 0, "noop", Actor::Rfid, None, Utc::now())
            .unwrap();
        assert_eq!(adj.previous_quantity, 4);
        assert_eq!(adj.new_quantity, 4);
        assert!(store.movement_log(tenant, item).unwrap().is_empty());
        assert_eq!(store.get(tenant, item).unwrap().unwrap().version, 0);
    }

    #[test]
    fn deltas_sum_to_quantity_change() {
        let store = InMemoryInventoryStore::new();
        let tenant = TenantId::new();
        let item = seed(&store, tenant, 100);

        for delta in [-10, 25, -40, 3] {
            store
                .adjust_quantity(tenant, item, delta, "test", Actor::Rfid, None, Utc::now())
                .unwrap();
        }
        // -120 refused; must not disturb the invariant.
        assert!(store
            .adjust_quantity(tenant, item, -120, "test", Actor::Rfid, None, Utc::now())
            .is_err());

        let record = store.get(tenant, item).unwrap().unwrap();
        let sum: i64 = store
            .movement_log(tenant, item)
            .unwrap()
            .iter()
            .map(|e| e.delta)
            .sum();
        assert_eq!(sum, record.quantity - 100);
        assert!(record.quantity >= 0);
    }

    #[test]
    fn duplicate_create_conflicts() {
        let store = InMemoryInventoryStore::new();
        let tenant = TenantId::new();
        let item_id = ItemId::new();
        let record =
            InventoryRecord::new(tenant, item_id, "widget", 1, 0, Utc::now()).unwrap();

        store.create(record.clone()).unwrap();
        assert!(matches!(
            store.create(record),
            Err(StoreError::Domain(DomainError::Conflict(_)))
        ));
    }
}
