//! `stockgate-auth` — pure authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: staff token
//! *claims* validation and gate-key comparison are deterministic functions;
//! signature verification/decoding stays in the transport layer.

pub mod claims;
pub mod gate_key;

pub use claims::{validate_claims, StaffClaims, TokenValidationError};
pub use gate_key::GateKey;
