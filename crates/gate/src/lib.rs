//! `stockgate-gate` — exit authorizations, gate decisions, and security
//! alerts.
//!
//! Pure domain types and expiry arithmetic; the decision engine itself (with
//! its latency budget and fail-closed behaviour) lives in `stockgate-infra`.

pub mod alert;
pub mod authorization;
pub mod decision;

pub use alert::{AlertSeverity, AlertStatus, NewAlert, SecurityAlert};
pub use authorization::{
    AuthorizationStatus, ExitAuthorization, DEFAULT_GATE_LOCATION, DEFAULT_VALIDITY_MINUTES,
};
pub use decision::GateDecision;
