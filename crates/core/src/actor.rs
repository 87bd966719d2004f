//! Actor identity recorded on audit-producing writes.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Who caused a state change: a staff user or the RFID hardware path.
///
/// Movement-log entries and issued authorizations carry this so operators can
/// tell human adjustments from reader-driven ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    User(UserId),
    Rfid,
}

impl Actor {
    pub fn is_hardware(&self) -> bool {
        matches!(self, Actor::Rfid)
    }
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Actor::User(id) => write!(f, "user:{id}"),
            Actor::Rfid => f.write_str("rfid"),
        }
    }
}
