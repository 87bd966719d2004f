use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use stockgate_core::{ItemId, TagId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/:tag_id/bind", post(bind_tag))
        .route("/:tag_id", get(get_binding))
}

/// Putaway/receiving: bind a tag to an item at a location.
pub async fn bind_tag(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(tag_id): Path<String>,
    Json(body): Json<dto::BindTagRequest>,
) -> axum::response::Response {
    let tag_id = match TagId::new(tag_id) {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let item_id: ItemId = match body.item_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    // The item must exist in tenant scope before a tag can point at it.
    match services.inventory.get(tenant.tenant_id(), item_id) {
        Ok(Some(_)) => {}
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => return errors::store_error_to_response(e),
    }

    match services.tags.bind(
        tenant.tenant_id(),
        tag_id,
        item_id,
        &body.location,
        Utc::now(),
    ) {
        Ok(binding) => (StatusCode::CREATED, Json(binding)).into_response(),
        // A duplicate live binding lost a race; non-fatal by contract.
        Err(e) => {
            tracing::warn!(tenant_id = %tenant.tenant_id(), error = %e, "bind conflict");
            errors::store_error_to_response(e)
        }
    }
}

pub async fn get_binding(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(tag_id): Path<String>,
) -> axum::response::Response {
    let tag_id = match TagId::new(tag_id) {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.tags.get(tenant.tenant_id(), &tag_id) {
        Ok(Some(binding)) => (StatusCode::OK, Json(binding)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "tag not bound"),
        Err(e) => errors::store_error_to_response(e),
    }
}
