use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockgate_core::DomainError;
use stockgate_infra::{IngestError, StoreError};

pub fn ingest_error_to_response(err: IngestError) -> axum::response::Response {
    match err {
        IngestError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        IngestError::InsufficientStock {
            available,
            requested,
            recorded_event,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": format!("delta {requested} refused: only {available} in stock"),
                // The event was recorded before the adjustment was refused.
                "event_id": recorded_event.to_string(),
            })),
        )
            .into_response(),
        IngestError::Store(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Timeout => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_timeout", "store timed out")
        }
        StoreError::Unavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InsufficientStock { available, requested } => json_error(
            StatusCode::CONFLICT,
            "insufficient_stock",
            format!("delta {requested} refused: only {available} in stock"),
        ),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
