use axum::Router;

pub mod alerts;
pub mod authorizations;
pub mod events;
pub mod gate;
pub mod items;
pub mod system;
pub mod tags;

/// Router for all staff (tenant-scoped, token-authenticated) endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/tags", tags::router())
        .nest("/events", events::router())
        .nest("/authorizations", authorizations::router())
        .nest("/alerts", alerts::router())
}
