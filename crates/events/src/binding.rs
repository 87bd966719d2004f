use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockgate_core::{ItemId, TagId, TenantId};

/// A physical tag's current association with a tracked item.
///
/// At most one bound item per (tenant, tag); rebinding overwrites. Bindings
/// are never hard-deleted (history lives in the event log, not here). A tag
/// may be read before it is bound, so `item_id` is nullable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBinding {
    pub tenant_id: TenantId,
    pub tag_id: TagId,
    pub item_id: Option<ItemId>,
    pub last_location: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

impl TagBinding {
    pub fn new(
        tenant_id: TenantId,
        tag_id: TagId,
        item_id: ItemId,
        location: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            tenant_id,
            tag_id,
            item_id: Some(item_id),
            last_location: Some(location.into()),
            last_seen_at: at,
        }
    }

    /// Record a sighting without changing the binding.
    pub fn touch(&mut self, location: Option<&str>, at: DateTime<Utc>) {
        if let Some(loc) = location {
            self.last_location = Some(loc.to_string());
        }
        self.last_seen_at = at;
    }
}
