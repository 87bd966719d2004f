//! `stockgate-events` — the immutable RFID event model.
//!
//! Every physical read that reaches the system becomes one `RfidEvent` row,
//! recorded before any downstream processing and never mutated afterwards.

pub mod binding;
pub mod event;

pub use binding::TagBinding;
pub use event::{EventKind, EventSource, RfidEvent};
