use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use stockgate_infra::GateRead;

use crate::app::routes::events::parse_optional_item_id;
use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new().route("/events", post(gate_event))
}

/// Exit-gate read: answers ALLOW/DENY within the decision budget.
///
/// Store trouble never becomes an HTTP error here; the engine fails closed
/// and the gate controller receives a well-formed DENY.
pub async fn gate_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::GateEventRequest>,
) -> axum::response::Response {
    let item_id = match parse_optional_item_id(body.item_id.as_deref()) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let read = GateRead {
        tag_id: body.tag_id,
        location: body.location,
        observed_at: body.observed_at,
        source: body.source,
        item_id,
    };

    match services.gate.decide(tenant.tenant_id(), read) {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "decision": outcome.decision,
                "authorized": outcome.authorized,
                "event": outcome.event,
                "item": outcome.item,
                "alert": outcome.alert,
            })),
        )
            .into_response(),
        // Only malformed input lands here, before decision semantics apply.
        Err(e) => errors::domain_error_to_response(e),
    }
}
