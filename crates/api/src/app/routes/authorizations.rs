use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};

use stockgate_core::{Actor, AuthorizationId, TagId};
use stockgate_gate::{DEFAULT_GATE_LOCATION, DEFAULT_VALIDITY_MINUTES};
use stockgate_infra::IssueBatch;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{StaffContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(issue).get(list_active))
        .route("/:id/revoke", post(revoke))
}

/// Staff-invoked issuance, single tag or batch (all tags of an order).
pub async fn issue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(staff): Extension<StaffContext>,
    Json(body): Json<dto::IssueAuthorizationRequest>,
) -> axum::response::Response {
    let raw_tags: Vec<String> = match (body.tag_id, body.tag_ids) {
        (Some(single), None) => vec![single],
        (None, Some(many)) => many,
        (Some(single), Some(mut many)) => {
            many.push(single);
            many
        }
        (None, None) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "tag_id or tag_ids is required",
            )
        }
    };

    let mut tag_ids = Vec::with_capacity(raw_tags.len());
    for raw in raw_tags {
        match TagId::new(raw) {
            Ok(t) => tag_ids.push(t),
            Err(e) => return errors::domain_error_to_response(e),
        }
    }

    let minutes = body.minutes.unwrap_or(DEFAULT_VALIDITY_MINUTES);
    if minutes <= 0 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "minutes must be positive",
        );
    }

    let batch = IssueBatch {
        tag_ids,
        location: body
            .location
            .unwrap_or_else(|| DEFAULT_GATE_LOCATION.to_string()),
        validity: Duration::minutes(minutes),
        order_id: body.order_id,
        issued_by: Actor::User(staff.user_id()),
    };

    match services.registry.issue_batch(tenant.tenant_id(), batch, Utc::now()) {
        Ok(issued) => {
            let expires_at = issued.first().map(|a| a.expires_at);
            (
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "authorizations": issued,
                    "expires_at": expires_at,
                })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_active(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::AuthorizationListQuery>,
) -> axum::response::Response {
    let tag_id = match query.tag_id {
        None => None,
        Some(raw) => match TagId::new(raw) {
            Ok(t) => Some(t),
            Err(e) => return errors::domain_error_to_response(e),
        },
    };

    match services.registry.list_active(
        tenant.tenant_id(),
        tag_id.as_ref(),
        query.location.as_deref(),
        Utc::now(),
    ) {
        Ok(active) => (StatusCode::OK, Json(active)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn revoke(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: AuthorizationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid authorization id",
            )
        }
    };

    match services.registry.revoke(tenant.tenant_id(), id) {
        Ok(revoked) => (StatusCode::OK, Json(revoked)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
