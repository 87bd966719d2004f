use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use stockgate_core::{ItemId, TagId, TenantId};
use stockgate_events::TagBinding;

use super::StoreError;

/// Durable tag→item binding plus last known physical location per tag.
///
/// `bind` is the single authoritative write path: last-write-wins per
/// (tenant, tag). A database-backed implementation may surface a
/// unique-constraint race as `Domain(Conflict)`; callers treat that as
/// non-fatal and log it.
pub trait TagLedger: Send + Sync {
    fn resolve_item(&self, tenant_id: TenantId, tag_id: &TagId)
        -> Result<Option<ItemId>, StoreError>;

    fn bind(
        &self,
        tenant_id: TenantId,
        tag_id: TagId,
        item_id: ItemId,
        location: &str,
        at: DateTime<Utc>,
    ) -> Result<TagBinding, StoreError>;

    /// Update last-seen fields; creates nothing for unbound tags.
    fn touch(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        location: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    fn get(&self, tenant_id: TenantId, tag_id: &TagId) -> Result<Option<TagBinding>, StoreError>;
}

/// In-memory tag ledger for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTagLedger {
    bindings: RwLock<HashMap<(TenantId, TagId), TagBinding>>,
}

impl InMemoryTagLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TagLedger for InMemoryTagLedger {
    fn resolve_item(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
    ) -> Result<Option<ItemId>, StoreError> {
        let map = self.bindings.read().map_err(|_| StoreError::poisoned())?;
        Ok(map
            .get(&(tenant_id, tag_id.clone()))
            .and_then(|b| b.item_id))
    }

    fn bind(
        &self,
        tenant_id: TenantId,
        tag_id: TagId,
        item_id: ItemId,
        location: &str,
        at: DateTime<Utc>,
    ) -> Result<TagBinding, StoreError> {
        let mut map = self.bindings.write().map_err(|_| StoreError::poisoned())?;
        // Atomic upsert: rebinding overwrites (tags are physically singulated,
        // so concurrent binds to one tag are rare and last-write-wins).
        let binding = TagBinding::new(tenant_id, tag_id.clone(), item_id, location, at);
        map.insert((tenant_id, tag_id), binding.clone());
        Ok(binding)
    }

    fn touch(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        location: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut map = self.bindings.write().map_err(|_| StoreError::poisoned())?;
        if let Some(binding) = map.get_mut(&(tenant_id, tag_id.clone())) {
            binding.touch(location, at);
        }
        Ok(())
    }

    fn get(&self, tenant_id: TenantId, tag_id: &TagId) -> Result<Option<TagBinding>, StoreError> {
        let map = self.bindings.read().map_err(|_| StoreError::poisoned())?;
        Ok(map.get(&(tenant_id, tag_id.clone())).cloned())
    }
}
