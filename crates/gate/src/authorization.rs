use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use stockgate_core::{Actor, AuthorizationId, TagId, TenantId};

/// Gate location used when an issuance request omits one.
pub const DEFAULT_GATE_LOCATION: &str = "EXIT_MAIN";

/// Validity window used when an issuance request omits one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 15;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    Active,
    Revoked,
}

/// A time-bounded permission for one tag to leave through one gate location.
///
/// At most one active, non-expired row exists per (tenant, tag, location);
/// the registry folds revocation of priors into issuance. Once expired a row
/// is inert: decisions never resurrect or extend it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitAuthorization {
    pub id: AuthorizationId,
    pub tenant_id: TenantId,
    pub tag_id: TagId,
    pub location: String,
    pub status: AuthorizationStatus,
    /// Order this authorization was issued for, when bulk-issued.
    pub order_id: Option<String>,
    pub issued_by: Actor,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub last_seen_source: Option<String>,
}

impl ExitAuthorization {
    pub fn issue(
        tenant_id: TenantId,
        tag_id: TagId,
        location: impl Into<String>,
        validity: Duration,
        order_id: Option<String>,
        issued_by: Actor,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuthorizationId::new(),
            tenant_id,
            tag_id,
            location: location.into(),
            status: AuthorizationStatus::Active,
            order_id,
            issued_by,
            issued_at: now,
            expires_at: now + validity,
            last_seen_at: None,
            last_seen_source: None,
        }
    }

    /// Active and not yet expired at `now`.
    ///
    /// This comparison is one of the two independent expiry guards; the other
    /// is the registry's eviction sweep. Both must hold on their own.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == AuthorizationStatus::Active && self.expires_at > now
    }

    pub fn revoke(&mut self) {
        self.status = AuthorizationStatus::Revoked;
    }

    /// Record a gate sighting. Side channel only; never gates a decision.
    pub fn mark_seen(&mut self, source: &str, at: DateTime<Utc>) {
        self.last_seen_at = Some(at);
        self.last_seen_source = Some(source.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth(now: DateTime<Utc>, minutes: i64) -> ExitAuthorization {
        ExitAuthorization::issue(
            TenantId::new(),
            TagId::new("E1").unwrap(),
            DEFAULT_GATE_LOCATION,
            Duration::minutes(minutes),
            None,
            Actor::Rfid,
            now,
        )
    }

    #[test]
    fn active_until_expiry_then_inert() {
        let now = Utc::now();
        let auth = test_auth(now, 10);

        assert!(auth.is_active(now));
        assert!(auth.is_active(now + Duration::minutes(9)));
        // Boundary: expires_at > now must hold strictly.
        assert!(!auth.is_active(now + Duration::minutes(10)));
        assert!(!auth.is_active(now + Duration::minutes(10) + Duration::seconds(1)));
    }

    #[test]
    fn revocation_wins_over_time_window() {
        let now = Utc::now();
        let mut auth = test_auth(now, 10);
        auth.revoke();
        assert!(!auth.is_active(now));
    }
}
