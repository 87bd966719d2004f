//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (stores + engines)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use stockgate_auth::GateKey;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &Config) -> Router {
    let auth_state = middleware::AuthState::hs256(&config.jwt_secret);
    let gate_state = middleware::GateAuthState {
        key: Arc::new(GateKey::new(config.gate_key.clone())),
    };

    let services = Arc::new(services::build_services(config.decision_budget));

    // Staff routes: require a valid token + tenant context.
    let staff = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    // Gate routes: device-credentialed, separate entry point.
    let gate = routes::gate::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            gate_state,
            middleware::gate_auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(staff)
        .nest("/gate", gate)
}
