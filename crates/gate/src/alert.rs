use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockgate_core::{AlertId, DomainError, DomainResult, EventId, ItemId, TagId, TenantId};

/// Alert severity. Unauthorized-exit denials are always `Critical`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
}

/// Operator triage status.
///
/// open → reviewed → resolved is the intended path, but any transition within
/// the enumeration is accepted; this is a human workflow, not a state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Open,
    Reviewed,
    Resolved,
}

impl AlertStatus {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "open" => Ok(AlertStatus::Open),
            "reviewed" => Ok(AlertStatus::Reviewed),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(DomainError::validation(format!(
                "unknown alert status '{other}' (expected open, reviewed, or resolved)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Open => "open",
            AlertStatus::Reviewed => "reviewed",
            AlertStatus::Resolved => "resolved",
        }
    }
}

/// Input to the alert sink when a gate read is denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub tag_id: TagId,
    pub item_id: Option<ItemId>,
    pub location: String,
    pub source: String,
    pub observed_at: DateTime<Utc>,
    pub causing_event: Option<EventId>,
}

/// Append-only record of one denial decision.
///
/// No deduplication: a tag loitering at a denied gate legitimately raises one
/// alert per read; collapsing them is operator triage, not engine logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: AlertId,
    pub tenant_id: TenantId,
    pub tag_id: TagId,
    pub item_id: Option<ItemId>,
    pub location: String,
    pub source: String,
    pub observed_at: DateTime<Utc>,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub message: String,
    pub causing_event: Option<EventId>,
    pub raised_at: DateTime<Utc>,
}

impl SecurityAlert {
    pub fn unauthorized_exit(tenant_id: TenantId, input: NewAlert, now: DateTime<Utc>) -> Self {
        let message = format!(
            "unauthorized exit attempt: tag {} at {}",
            input.tag_id, input.location
        );
        Self {
            id: AlertId::new(),
            tenant_id,
            tag_id: input.tag_id,
            item_id: input.item_id,
            location: input.location,
            source: input.source,
            observed_at: input.observed_at,
            severity: AlertSeverity::Critical,
            status: AlertStatus::Open,
            message,
            causing_event: input.causing_event,
            raised_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_fixed_enumeration_only() {
        assert_eq!(AlertStatus::parse("open").unwrap(), AlertStatus::Open);
        assert_eq!(AlertStatus::parse("reviewed").unwrap(), AlertStatus::Reviewed);
        assert_eq!(AlertStatus::parse("resolved").unwrap(), AlertStatus::Resolved);
        assert!(AlertStatus::parse("escalated").is_err());
    }

    #[test]
    fn unauthorized_exit_alerts_open_critical() {
        let alert = SecurityAlert::unauthorized_exit(
            TenantId::new(),
            NewAlert {
                tag_id: TagId::new("E9").unwrap(),
                item_id: None,
                location: "EXIT_SIDE".to_string(),
                source: "gate".to_string(),
                observed_at: Utc::now(),
                causing_event: Some(EventId::new()),
            },
            Utc::now(),
        );
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.status, AlertStatus::Open);
        assert!(alert.message.contains("E9"));
    }
}
