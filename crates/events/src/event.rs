use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockgate_core::{DomainError, DomainResult, EventId, ItemId, TagId, TenantId};

/// What a reader reported, as a closed tagged union.
///
/// The source hardware sends a free-form `event_type` string plus an optional
/// delta; parsing collapses that into one of the three kinds the core logic
/// understands. Anything else is rejected before any write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// A bare presence read (fixed reader or handheld).
    Scan,
    /// A read that implies the tag changed location.
    Move,
    /// A read carrying a signed stock adjustment.
    Quantity { delta: i64 },
}

impl EventKind {
    /// Parse the wire `event_type` + optional delta into a kind.
    ///
    /// `quantity` requires a delta; `scan`/`move` ignore one if supplied
    /// (handhelds send it unconditionally).
    pub fn parse(event_type: &str, delta: Option<i64>) -> DomainResult<Self> {
        match event_type {
            "scan" => Ok(EventKind::Scan),
            "move" => Ok(EventKind::Move),
            "quantity" => match delta {
                Some(d) => Ok(EventKind::Quantity { delta: d }),
                None => Err(DomainError::validation(
                    "quantity event requires a delta",
                )),
            },
            other => Err(DomainError::validation(format!(
                "unknown event type '{other}' (expected scan, move, or quantity)"
            ))),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::Scan => "scan",
            EventKind::Move => "move",
            EventKind::Quantity { .. } => "quantity",
        }
    }

    /// Signed stock delta carried by this read, if any.
    pub fn delta(&self) -> Option<i64> {
        match self {
            EventKind::Quantity { delta } => Some(*delta),
            _ => None,
        }
    }
}

/// Where a read came from (reader id, "handheld", "gate", ...).
///
/// Opaque to the core logic; kept for audit and alert triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventSource(String);

impl EventSource {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EventSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded physical read. Immutable once stored.
///
/// `observed_at` is the device clock (devices buffer offline, so it may lag
/// or even precede neighbours); `ingested_at` is assigned when the row is
/// durably recorded. Ordering decisions use `observed_at`, durability
/// decisions use `ingested_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfidEvent {
    pub id: EventId,
    pub tenant_id: TenantId,
    pub tag_id: TagId,
    pub kind: EventKind,
    /// Item resolution available at ingest time; events from unbound tags
    /// are recorded with `None` and are not reprocessed retroactively.
    pub item_id: Option<ItemId>,
    pub location: Option<String>,
    pub observed_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
    pub source: EventSource,
    /// Free-form device metadata, retained verbatim for audit. Never parsed
    /// by the core logic.
    pub raw_payload: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(EventKind::parse("scan", None).unwrap(), EventKind::Scan);
        assert_eq!(EventKind::parse("move", Some(3)).unwrap(), EventKind::Move);
        assert_eq!(
            EventKind::parse("quantity", Some(-4)).unwrap(),
            EventKind::Quantity { delta: -4 }
        );
    }

    #[test]
    fn quantity_without_delta_is_rejected() {
        let err = EventKind::parse("quantity", None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = EventKind::parse("teleport", None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
