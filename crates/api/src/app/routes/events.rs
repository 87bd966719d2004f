use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use stockgate_core::{Actor, ItemId};
use stockgate_infra::IngestRequest;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{StaffContext, TenantContext};

pub fn router() -> Router {
    Router::new().route("/", post(ingest_event))
}

/// Interior event ingestion (fixed readers and handhelds, relayed through a
/// staff session).
pub async fn ingest_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(staff): Extension<StaffContext>,
    Json(body): Json<dto::IngestEventRequest>,
) -> axum::response::Response {
    let item_id = match parse_optional_item_id(body.item_id.as_deref()) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let request = IngestRequest {
        tag_id: body.tag_id,
        event_type: body.event_type,
        location: body.location,
        delta: body.delta,
        observed_at: body.observed_at,
        source: body.source,
        item_id,
        raw_payload: body.raw_payload,
        actor: Actor::User(staff.user_id()),
    };

    match services.ingestor.ingest(tenant.tenant_id(), request) {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "event": outcome.event,
                "processed": outcome.processed,
                "wrote_log": outcome.wrote_log,
            })),
        )
            .into_response(),
        Err(e) => errors::ingest_error_to_response(e),
    }
}

pub(super) fn parse_optional_item_id(
    raw: Option<&str>,
) -> Result<Option<ItemId>, axum::response::Response> {
    match raw {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id")
        }),
    }
}
