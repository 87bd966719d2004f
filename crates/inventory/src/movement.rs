use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockgate_core::{Actor, EventId, ItemId, TenantId};

/// What kind of change a movement-log entry records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementAction {
    /// Quantity changed by a signed delta.
    QuantityAdjusted,
    /// Tag observed at a new location; quantity untouched (delta 0).
    LocationUpdated,
}

/// Immutable audit record of one inventory change.
///
/// Append-only; `new_quantity = previous_quantity + delta` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementLogEntry {
    pub item_id: ItemId,
    pub tenant_id: TenantId,
    pub action: MovementAction,
    pub delta: i64,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub reason: String,
    pub actor: Actor,
    /// The RFID event that caused this change, when hardware-driven.
    pub causing_event: Option<EventId>,
    pub at: DateTime<Utc>,
}

impl MovementLogEntry {
    /// Internal consistency of the quantity pair.
    pub fn is_consistent(&self) -> bool {
        self.previous_quantity + self.delta == self.new_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_check_detects_broken_pairs() {
        let mut entry = MovementLogEntry {
            item_id: ItemId::new(),
            tenant_id: TenantId::new(),
            action: MovementAction::QuantityAdjusted,
            delta: -3,
            previous_quantity: 10,
            new_quantity: 7,
            reason: "rfid quantity event".to_string(),
            actor: Actor::Rfid,
            causing_event: Some(EventId::new()),
            at: Utc::now(),
        };
        assert!(entry.is_consistent());

        entry.new_quantity = 8;
        assert!(!entry.is_consistent());
    }
}
