use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use stockgate_core::{AlertId, DomainError, TenantId};
use stockgate_gate::{AlertStatus, NewAlert, SecurityAlert};

use super::StoreError;

/// Append-only record of denial events for operator review.
///
/// One alert per denial decision; repeated reads of a loitering tag raise
/// repeated alerts, deliberately left to triage.
pub trait AlertSink: Send + Sync {
    fn raise(
        &self,
        tenant_id: TenantId,
        alert: NewAlert,
        now: DateTime<Utc>,
    ) -> Result<SecurityAlert, StoreError>;

    fn list(
        &self,
        tenant_id: TenantId,
        status: Option<AlertStatus>,
    ) -> Result<Vec<SecurityAlert>, StoreError>;

    /// Move an alert to any status in the fixed enumeration. Human triage
    /// workflow; no transition ordering is enforced.
    fn transition(
        &self,
        tenant_id: TenantId,
        alert_id: AlertId,
        status: AlertStatus,
    ) -> Result<SecurityAlert, StoreError>;
}

/// In-memory alert sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAlertSink {
    alerts: RwLock<HashMap<TenantId, Vec<SecurityAlert>>>,
}

impl InMemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertSink for InMemoryAlertSink {
    fn raise(
        &self,
        tenant_id: TenantId,
        alert: NewAlert,
        now: DateTime<Utc>,
    ) -> Result<SecurityAlert, StoreError> {
        let mut map = self.alerts.write().map_err(|_| StoreError::poisoned())?;
        let alert = SecurityAlert::unauthorized_exit(tenant_id, alert, now);
        map.entry(tenant_id).or_default().push(alert.clone());
        Ok(alert)
    }

    fn list(
        &self,
        tenant_id: TenantId,
        status: Option<AlertStatus>,
    ) -> Result<Vec<SecurityAlert>, StoreError> {
        let map = self.alerts.read().map_err(|_| StoreError::poisoned())?;
        let alerts = map.get(&tenant_id).cloned().unwrap_or_default();
        Ok(match status {
            Some(s) => alerts.into_iter().filter(|a| a.status == s).collect(),
            None => alerts,
        })
    }

    fn transition(
        &self,
        tenant_id: TenantId,
        alert_id: AlertId,
        status: AlertStatus,
    ) -> Result<SecurityAlert, StoreError> {
        let mut map = self.alerts.write().map_err(|_| StoreError::poisoned())?;
        let alert = map
            .get_mut(&tenant_id)
            .and_then(|alerts| alerts.iter_mut().find(|a| a.id == alert_id))
            .ok_or(DomainError::NotFound)?;
        alert.status = status;
        Ok(alert.clone())
    }
}

#[cfg(test)]
mod tests {
    use stockgate_core::TagId;

    use super::*;

    fn new_alert(tag: &str) -> NewAlert {
        NewAlert {
            tag_id: TagId::new(tag).unwrap(),
            item_id: None,
            location: "EXIT_MAIN".to_string(),
            source: "gate".to_string(),
            observed_at: Utc::now(),
            causing_event: None,
        }
    }

    #[test]
    fn repeated_denials_raise_repeated_alerts() {
        let sink = InMemoryAlertSink::new();
        let tenant = TenantId::new();

        sink.raise(tenant, new_alert("E1"), Utc::now()).unwrap();
        sink.raise(tenant, new_alert("E1"), Utc::now()).unwrap();

        assert_eq!(sink.list(tenant, None).unwrap().len(), 2);
    }

    #[test]
    fn any_transition_within_the_enumeration_is_accepted() {
        let sink = InMemoryAlertSink::new();
        let tenant = TenantId::new();
        let alert = sink.raise(tenant, new_alert("E1"), Utc::now()).unwrap();

        // resolved straight from open, then back to reviewed: both fine.
        let a = sink.transition(tenant, alert.id, AlertStatus::Resolved).unwrap();
        assert_eq!(a.status, AlertStatus::Resolved);
        let a = sink.transition(tenant, alert.id, AlertStatus::Reviewed).unwrap();
        assert_eq!(a.status, AlertStatus::Reviewed);

        let open = sink.list(tenant, Some(AlertStatus::Open)).unwrap();
        assert!(open.is_empty());
    }

    #[test]
    fn transition_of_unknown_alert_is_not_found() {
        let sink = InMemoryAlertSink::new();
        assert!(matches!(
            sink.transition(TenantId::new(), AlertId::new(), AlertStatus::Reviewed),
            Err(StoreError::Domain(DomainError::NotFound))
        ));
    }
}
