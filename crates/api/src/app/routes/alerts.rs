use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockgate_core::AlertId;
use stockgate_gate::AlertStatus;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/:id/status", post(update_status))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::AlertListQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match AlertStatus::parse(raw) {
            Ok(s) => Some(s),
            Err(e) => return errors::domain_error_to_response(e),
        },
    };

    match services.alerts.list(tenant.tenant_id(), status) {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAlertStatusRequest>,
) -> axum::response::Response {
    let alert_id: AlertId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid alert id"),
    };

    let status = match AlertStatus::parse(&body.status) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.alerts.transition(tenant.tenant_id(), alert_id, status) {
        Ok(alert) => (StatusCode::OK, Json(alert)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
