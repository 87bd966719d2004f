//! Gate decision engine.
//!
//! Each exit-gate read gets a binary answer inside a hard latency budget.
//! The derived states (no authorization / authorized / expired) are computed
//! from the registry at decision time, never stored. When the registry cannot
//! answer in time, the decision fails closed to DENY; the physical gate never
//! sees an error, because it cannot retry a read it already made.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use stockgate_core::{DomainResult, EventId, ItemId, TagId, TenantId};
use stockgate_events::{EventKind, EventSource, RfidEvent};
use stockgate_gate::{GateDecision, NewAlert, SecurityAlert, DEFAULT_GATE_LOCATION};
use stockgate_inventory::InventoryRecord;

use crate::stores::{AlertSink, AuthorizationRegistry, EventLog, InventoryStore, TagLedger};

/// Default decision budget. Fixed gate readers time out shortly after this.
pub const DEFAULT_DECISION_BUDGET: Duration = Duration::from_millis(250);

/// One read at an exit gate, as the device reports it.
#[derive(Debug, Clone)]
pub struct GateRead {
    pub tag_id: String,
    pub location: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
    /// Explicit item resolution; takes precedence over the tag binding.
    pub item_id: Option<ItemId>,
}

/// Everything the gate controller (and its operators) get back.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub decision: GateDecision,
    pub authorized: bool,
    pub event: RfidEvent,
    pub item: Option<InventoryRecord>,
    pub alert: Option<SecurityAlert>,
}

pub struct GateDecisionEngine {
    registry: Arc<dyn AuthorizationRegistry>,
    tags: Arc<dyn TagLedger>,
    inventory: Arc<dyn InventoryStore>,
    events: Arc<dyn EventLog>,
    alerts: Arc<dyn AlertSink>,
    budget: Duration,
}

impl GateDecisionEngine {
    pub fn new(
        registry: Arc<dyn AuthorizationRegistry>,
        tags: Arc<dyn TagLedger>,
        inventory: Arc<dyn InventoryStore>,
        events: Arc<dyn EventLog>,
        alerts: Arc<dyn AlertSink>,
        budget: Duration,
    ) -> Self {
        Self {
            registry,
            tags,
            inventory,
            events,
            alerts,
            budget,
        }
    }

    /// Decide one gate read.
    ///
    /// Errors only on malformed input (empty tag id), before any decision
    /// semantics apply. Store trouble never surfaces as an error: it resolves
    /// to DENY with a best-effort alert.
    pub fn decide(&self, tenant_id: TenantId, read: GateRead) -> DomainResult<GateOutcome> {
        let tag_id = TagId::new(read.tag_id)?;
        let location = read
            .location
            .unwrap_or_else(|| DEFAULT_GATE_LOCATION.to_string());
        let source = read.source.unwrap_or_else(|| "gate".to_string());
        let now = Utc::now();

        let item_id = self.resolve_item(tenant_id, &tag_id, read.item_id);

        // The read is an RFID event like any other; record it before
        // deciding. A failed append loses the audit row but must not stall
        // the gate.
        let event = RfidEvent {
            id: EventId::new(),
            tenant_id,
            tag_id: tag_id.clone(),
            kind: EventKind::Scan,
            item_id,
            location: Some(location.clone()),
            observed_at: read.observed_at.unwrap_or(now),
            ingested_at: now,
            source: EventSource::new(source.clone()),
            raw_payload: None,
        };
        if let Err(e) = self.events.append(event.clone()) {
            error!(
                tenant_id = %tenant_id,
                tag_id = %tag_id,
                error = %e,
                "failed to record gate event; deciding anyway"
            );
        }

        // Budget-bounded registry lookup. The clock check also covers a
        // registry that answered, but too late to matter.
        let started = Instant::now();
        let lookup = self.registry.active_for(tenant_id, &tag_id, &location, now);
        let within_budget = started.elapsed() <= self.budget;

        let authorization = match lookup {
            Ok(found) if within_budget => found,
            Ok(_) => {
                warn!(
                    tenant_id = %tenant_id,
                    tag_id = %tag_id,
                    location = %location,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "registry answered past the decision budget; failing closed"
                );
                None
            }
            Err(e) => {
                warn!(
                    tenant_id = %tenant_id,
                    tag_id = %tag_id,
                    location = %location,
                    error = %e,
                    "registry lookup failed; failing closed"
                );
                None
            }
        };

        let item = match item_id {
            Some(id) => self.inventory.get(tenant_id, id).ok().flatten(),
            None => None,
        };

        let outcome = match authorization {
            Some(auth) => {
                // Non-blocking side effect; never gates the decision.
                if let Err(e) = self.registry.mark_seen(tenant_id, auth.id, &source, now) {
                    warn!(
                        tenant_id = %tenant_id,
                        authorization_id = %auth.id,
                        error = %e,
                        "failed to touch authorization last-seen"
                    );
                }
                GateOutcome {
                    decision: GateDecision::Allow,
                    authorized: true,
                    event,
                    item,
                    alert: None,
                }
            }
            None => {
                let alert = self.raise_alert(tenant_id, &tag_id, item_id, &location, &source, &event);
                GateOutcome {
                    decision: GateDecision::Deny,
                    authorized: false,
                    event,
                    item,
                    alert,
                }
            }
        };

        info!(
            tenant_id = %tenant_id,
            tag_id = %tag_id,
            location = %location,
            decision = %outcome.decision,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "gate decision"
        );

        Ok(outcome)
    }

    fn resolve_item(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        explicit: Option<ItemId>,
    ) -> Option<ItemId> {
        if let Some(item_id) = explicit {
            match self.inventory.get(tenant_id, item_id) {
                Ok(Some(_)) => return Some(item_id),
                Ok(None) => {
                    warn!(
                        tenant_id = %tenant_id,
                        tag_id = %tag_id,
                        item_id = %item_id,
                        "explicit item id on gate read not found in tenant scope"
                    );
                    return None;
                }
                Err(e) => {
                    warn!(tenant_id = %tenant_id, error = %e, "item lookup failed on gate read");
                    return None;
                }
            }
        }
        match self.tags.resolve_item(tenant_id, tag_id) {
            Ok(found) => found,
            Err(e) => {
                warn!(tenant_id = %tenant_id, error = %e, "tag resolution failed on gate read");
                None
            }
        }
    }

    /// Raise the denial alert. Best-effort: a failed insert is logged and the
    /// gate still gets its DENY.
    fn raise_alert(
        &self,
        tenant_id: TenantId,
        tag_id: &TagId,
        item_id: Option<ItemId>,
        location: &str,
        source: &str,
        event: &RfidEvent,
    ) -> Option<SecurityAlert> {
        let alert = NewAlert {
            tag_id: tag_id.clone(),
            item_id,
            location: location.to_string(),
            source: source.to_string(),
            observed_at: event.observed_at,
            causing_event: Some(event.id),
        };
        match self.alerts.raise(tenant_id, alert, Utc::now()) {
            Ok(alert) => Some(alert),
            Err(e) => {
                error!(
                    tenant_id = %tenant_id,
                    tag_id = %tag_id,
                    error = %e,
                    "failed to persist security alert for denied gate read"
                );
                None
            }
        }
    }
}
