use chrono::{DateTime, Utc};
use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub initial_quantity: Option<i64>,
    #[serde(default)]
    pub reorder_threshold: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BindTagRequest {
    pub item_id: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct IngestEventRequest {
    pub tag_id: String,
    pub event_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub delta: Option<i64>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub raw_payload: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GateEventRequest {
    pub tag_id: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
}

/// Issuance accepts a single tag or a batch (e.g. all tags on an order).
#[derive(Debug, Deserialize)]
pub struct IssueAuthorizationRequest {
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub minutes: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlertStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizationListQuery {
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertListQuery {
    #[serde(default)]
    pub status: Option<String>,
}
