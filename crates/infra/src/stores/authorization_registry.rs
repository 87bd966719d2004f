use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use stockgate_core::{Actor, AuthorizationId, DomainError, TagId, TenantId};
use stockgate_gate::ExitAuthorization;

use super::StoreError;

/// One bulk issuance request (all tags share location, window, and order).
#[derive(Debug, Clone)]
pub struct IssueBatch {
    pub tag_ids: Vec<TagId>,
    pub location: String,
    pub validity: Duration,
    pub order_id: Option<String>,
    pub issued_by: Actor,
}

/// Time-bounded exit permissions per (tag, gate-location).
///
/// The registry owns the "at most one active, non-expired row per
/// (tenant, tag, location)" invariant: issuance folds revocation of priors
/// into the same write section, so a concurrent gate read never observes a
/// zero-authorization window during re-authorization.
pub trait AuthorizationRegistry: Send + Sync {
    /// Issue authorizations for every tag in the batch as one logical write.
    fn issue_batch(
        &self,
        tenant_id: TenantId,
        batch: IssueBatch,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExitAuthorization>, StoreError>;

    /// The single most recent active, non-expired authorization for
    /// (tenant, tag, location); ties broken by latest `expires_at`.
    fn active_for(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ExitAuthorization>, StoreError>;

    /// Record a gate sighting on an authorization. Side channel only.
    fn mark_seen(
        &self,
        tenant_id: TenantId,
        id: AuthorizationId,
        source: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Explicit revocation.
    fn revoke(
        &self,
        tenant_id: TenantId,
        id: AuthorizationId,
    ) -> Result<ExitAuthorization, StoreError>;

    fn list_active(
        &self,
        tenant_id: TenantId,
        tag_id: Option<&TagId>,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExitAuthorization>, StoreError>;
}

/// In-memory registry for tests/dev.
///
/// Expired rows are swept on every write (the TTL eviction guard); the
/// decision-time `expires_at > now` comparison in `active_for` holds
/// independently of the sweep.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationRegistry {
    rows: RwLock<Vec<ExitAuthorization>>,
}

impl InMemoryAuthorizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows for a tenant, swept or not. Test/triage visibility.
    pub fn dump(&self, tenant_id: TenantId) -> Vec<ExitAuthorization> {
        self.rows
            .read()
            .map(|rows| {
                rows.iter()
                    .filter(|a| a.tenant_id == tenant_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AuthorizationRegistry for InMemoryAuthorizationRegistry {
    fn issue_batch(
        &self,
        tenant_id: TenantId,
        batch: IssueBatch,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExitAuthorization>, StoreError> {
        if batch.tag_ids.is_empty() {
            return Err(DomainError::validation("batch contains no tags").into());
        }

        let mut rows = self.rows.write().map_err(|_| StoreError::poisoned())?;

        // TTL eviction, piggybacked on writes.
        rows.retain(|a| a.expires_at > now);

        let mut issued = Vec::with_capacity(batch.tag_ids.len());
        for tag_id in batch.tag_ids {
            // Revoke-folded-into-insert: priors for this (tag, location) die
            // in the same critical section the replacement appears in.
            for row in rows.iter_mut() {
                if row.tenant_id == tenant_id
                    && row.tag_id == tag_id
                    && row.location == batch.location
                {
                    row.revoke();
                }
            }

            let auth = ExitAuthorization::issue(
                tenant_id,
                tag_id,
                batch.location.clone(),
                batch.validity,
                batch.order_id.clone(),
                batch.issued_by,
                now,
            );
            rows.push(auth.clone());
            issued.push(auth);
        }

        Ok(issued)
    }

    fn active_for(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ExitAuthorization>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::poisoned())?;
        Ok(rows
            .iter()
            .filter(|a| {
                a.tenant_id == tenant_id
                    && &a.tag_id == tag_id
                    && a.location == location
                    && a.is_active(now)
            })
            .max_by_key(|a| a.expires_at)
            .cloned())
    }

    fn mark_seen(
        &self,
        tenant_id: TenantId,
        id: AuthorizationId,
        source: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::poisoned())?;
        let row = rows
            .iter_mut()
            .find(|a| a.tenant_id == tenant_id && a.id == id)
            .ok_or(DomainError::NotFound)?;
        row.mark_seen(source, at);
        Ok(())
    }

    fn revoke(
        &self,
        tenant_id: TenantId,
        id: AuthorizationId,
    ) -> Result<ExitAuthorization, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::poisoned())?;
        let row = rows
            .iter_mut()
            .find(|a| a.tenant_id == tenant_id && a.id == id)
            .ok_or(DomainError::NotFound)?;
        row.revoke();
        Ok(row.clone())
    }

    fn list_active(
        &self,
        tenant_id: TenantId,
        tag_id: Option<&TagId>,
        location: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExitAuthorization>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::poisoned())?;
        Ok(rows
            .iter()
            .filter(|a| a.tenant_id == tenant_id && a.is_active(now))
            .filter(|a| tag_id.is_none_or(|t| &a.tag_id == t))
            .filter(|a| location.is_none_or(|l| a.location == l))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use stockgate_gate::DEFAULT_GATE_LOCATION;

    use super::*;

    fn tag(s: &str) -> TagId {
        TagId::new(s).unwrap()
    }

    fn batch(tags: &[&str], location: &str, minutes: i64) -> IssueBatch {
        IssueBatch {
            tag_ids: tags.iter().map(|t| tag(t)).collect(),
            location: location.to_string(),
            validity: Duration::minutes(minutes),
            order_id: None,
            issued_by: Actor::Rfid,
        }
    }

    #[test]
    fn reissue_leaves_exactly_one_active_row() {
        let registry = InMemoryAuthorizationRegistry::new();
        let tenant = TenantId::new();
        let now = Utc::now();

        registry.issue_batch(tenant, batch(&["E1"], DEFAULT_GATE_LOCATION, 10), now).unwrap();
        registry.issue_batch(tenant, batch(&["E1"], DEFAULT_GATE_LOCATION, 10), now).unwrap();
        registry.issue_batch(tenant, batch(&["E1"], DEFAULT_GATE_LOCATION, 10), now).unwrap();

        let active = registry
            .list_active(tenant, Some(&tag("E1")), Some(DEFAULT_GATE_LOCATION), now)
            .unwrap();
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn active_for_is_tenant_scoped() {
        let registry = InMemoryAuthorizationRegistry::new();
        let tenant = TenantId::new();
        let other = TenantId::new();
        let now = Utc::now();

        registry.issue_batch(tenant, batch(&["E1"], "EXIT_MAIN", 10), now).unwrap();

        assert!(registry.active_for(tenant, &tag("E1"), "EXIT_MAIN", now).unwrap().is_some());
        assert!(registry.active_for(other, &tag("E1"), "EXIT_MAIN", now).unwrap().is_none());
        assert!(registry.list_active(other, None, None, now).unwrap().is_empty());
    }

    #[test]
    fn authorizations_are_location_scoped() {
        let registry = InMemoryAuthorizationRegistry::new();
        let tenant = TenantId::new();
        let now = Utc::now();

        registry.issue_batch(tenant, batch(&["E1"], "EXIT_MAIN", 10), now).unwrap();

        assert!(registry.active_for(tenant, &tag("E1"), "EXIT_MAIN", now).unwrap().is_some());
        assert!(registry.active_for(tenant, &tag("E1"), "EXIT_SIDE", now).unwrap().is_none());
    }

    #[test]
    fn expiry_holds_at_decision_time_without_a_sweep() {
        let registry = InMemoryAuthorizationRegistry::new();
        let tenant = TenantId::new();
        let now = Utc::now();

        registry.issue_batch(tenant, batch(&["E1"], "EXIT_MAIN", 10), now).unwrap();

        let one_tick_after = now + Duration::minutes(10) + Duration::seconds(1);
        assert!(registry
            .active_for(tenant, &tag("E1"), "EXIT_MAIN", one_tick_after)
            .unwrap()
            .is_none());
        // The row is still present (no write happened); only the comparison
        // made it inert.
        assert_eq!(registry.dump(tenant).len(), 1);
    }

    #[test]
    fn writes_sweep_expired_rows() {
        let registry = InMemoryAuthorizationRegistry::new();
        let tenant = TenantId::new();
        let now = Utc::now();

        registry.issue_batch(tenant, batch(&["E1"], "EXIT_MAIN", 10), now).unwrap();

        let later = now + Duration::minutes(11);
        registry.issue_batch(tenant, batch(&["E2"], "EXIT_MAIN", 10), later).unwrap();

        let rows = registry.dump(tenant);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag_id, tag("E2"));
    }

    #[test]
    fn bulk_issuance_covers_every_tag() {
        let registry = InMemoryAuthorizationRegistry::new();
        let tenant = TenantId::new();
        let now = Utc::now();

        let issued = registry
            .issue_batch(tenant, batch(&["E1", "E2", "E3"], "EXIT_MAIN", 10), now)
            .unwrap();
        assert_eq!(issued.len(), 3);
        for t in ["E1", "E2", "E3"] {
            assert!(registry.active_for(tenant, &tag(t), "EXIT_MAIN", now).unwrap().is_some());
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        let registry = InMemoryAuthorizationRegistry::new();
        let err = registry
            .issue_batch(TenantId::new(), batch(&[], "EXIT_MAIN", 10), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn revoke_and_mark_seen_are_tenant_scoped() {
        let registry = InMemoryAuthorizationRegistry::new();
        let tenant = TenantId::new();
        let other = TenantId::new();
        let now = Utc::now();

        let issued = registry
            .issue_batch(tenant, batch(&["E1"], "EXIT_MAIN", 10), now)
            .unwrap();
        let id = issued[0].id;

        assert!(matches!(
            registry.revoke(other, id),
            Err(StoreError::Domain(DomainError::NotFound))
        ));
        registry.mark_seen(tenant, id, "gate", now).unwrap();
        let revoked = registry.revoke(tenant, id).unwrap();
        assert!(!revoked.is_active(now));
        assert_eq!(revoked.last_seen_source.as_deref(), Some("gate"));
    }
}
