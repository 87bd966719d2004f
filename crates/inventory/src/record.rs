use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockgate_core::{DomainError, DomainResult, ItemId, TenantId};

/// Per-item quantity and reorder threshold.
///
/// `quantity` is never negative. `version` bumps on every quantity write and
/// backs the store's compare-and-set guard against concurrent adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub item_id: ItemId,
    pub tenant_id: TenantId,
    pub name: String,
    pub quantity: i64,
    pub reorder_threshold: i64,
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

impl InventoryRecord {
    pub fn new(
        tenant_id: TenantId,
        item_id: ItemId,
        name: impl Into<String>,
        initial_quantity: i64,
        reorder_threshold: i64,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if initial_quantity < 0 {
            return Err(DomainError::validation("initial quantity cannot be negative"));
        }
        if reorder_threshold < 0 {
            return Err(DomainError::validation("reorder threshold cannot be negative"));
        }
        Ok(Self {
            item_id,
            tenant_id,
            name,
            quantity: initial_quantity,
            reorder_threshold,
            version: 0,
            created_at: at,
        })
    }

    pub fn below_reorder_threshold(&self) -> bool {
        self.quantity < self.reorder_threshold
    }
}

/// Outcome of one admitted quantity adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub previous_quantity: i64,
    pub new_quantity: i64,
}

/// Compute the candidate quantity for a signed delta, failing closed.
///
/// Pure arithmetic: no store access, no deduplication (duplicate events are
/// the ingestor's concern, and deliberately re-apply here). A candidate below
/// zero yields `InsufficientStock` and the caller must not write.
pub fn plan_adjustment(current: i64, delta: i64) -> DomainResult<Adjustment> {
    let candidate = current
        .checked_add(delta)
        .ok_or_else(|| DomainError::validation("quantity adjustment overflows"))?;
    if candidate < 0 {
        return Err(DomainError::insufficient_stock(current, delta));
    }
    Ok(Adjustment {
        previous_quantity: current,
        new_quantity: candidate,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn test_tenant_id() -> TenantId {
        TenantId::from_uuid(uuid::Uuid::from_u128(1))
    }

    #[test]
    fn record_rejects_blank_name_and_negative_initials() {
        let t = test_tenant_id();
        let at = Utc::now();
        assert!(InventoryRecord::new(t, ItemId::new(), "  ", 0, 0, at).is_err());
        assert!(InventoryRecord::new(t, ItemId::new(), "widget", -1, 0, at).is_err());
        assert!(InventoryRecord::new(t, ItemId::new(), "widget", 0, -1, at).is_err());
    }

    #[test]
    fn adjustment_fails_closed_below_zero() {
        let err = plan_adjustment(7, -20).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(7, -20));

        let ok = plan_adjustment(10, -3).unwrap();
        assert_eq!(ok.previous_quantity, 10);
        assert_eq!(ok.new_quantity, 7);
    }

    #[test]
    fn reorder_flag_uses_strict_comparison() {
        let t = test_tenant_id();
        let mut rec =
            InventoryRecord::new(t, ItemId::new(), "widget", 5, 5, Utc::now()).unwrap();
        assert!(!rec.below_reorder_threshold());
        rec.quantity = 4;
        assert!(rec.below_reorder_threshold());
    }

    proptest! {
        /// Property: an admitted adjustment is internally consistent
        /// (new = previous + delta) and never leaves quantity negative.
        #[test]
        fn admitted_adjustments_are_consistent(
            current in 0i64..1_000_000,
            delta in -1_000_000i64..1_000_000,
        ) {
            match plan_adjustment(current, delta) {
                Ok(adj) => {
                    prop_assert_eq!(adj.previous_quantity, current);
                    prop_assert_eq!(adj.new_quantity, current + delta);
                    prop_assert!(adj.new_quantity >= 0);
                }
                Err(DomainError::InsufficientStock { available, requested }) => {
                    prop_assert_eq!(available, current);
                    prop_assert_eq!(requested, delta);
                    prop_assert!(current + delta < 0);
                }
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
        }
    }
}
