use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use stockgate_core::ItemId;
use stockgate_inventory::InventoryRecord;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item))
        .route("/:id", get(get_item))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let item_id = ItemId::new();
    let record = match InventoryRecord::new(
        tenant.tenant_id(),
        item_id,
        body.name,
        body.initial_quantity.unwrap_or(0),
        body.reorder_threshold.unwrap_or(0),
        Utc::now(),
    ) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.inventory.create(record.clone()) {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(record)).into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    let record = match services.inventory.get(tenant.tenant_id(), item_id) {
        Ok(Some(r)) => r,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    let movements = match services.inventory.movement_log(tenant.tenant_id(), item_id) {
        Ok(m) => m,
        Err(e) => return errors::store_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "item": record,
            "movement_log": movements,
        })),
    )
        .into_response()
}
