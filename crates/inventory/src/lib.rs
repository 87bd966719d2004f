//! `stockgate-inventory` — versioned per-item quantities and the append-only
//! movement log.
//!
//! The arithmetic here is pure and fails closed: a delta that would drive
//! quantity below zero is refused before any write. Atomicity (quantity write
//! paired with exactly one log entry) is the store's job, in `stockgate-infra`.

pub mod movement;
pub mod record;

pub use movement::{MovementAction, MovementLogEntry};
pub use record::{plan_adjustment, Adjustment, InventoryRecord};
