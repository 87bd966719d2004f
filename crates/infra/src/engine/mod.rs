//! The two orchestration engines over the store seams.
//!
//! Both thread an explicit `TenantId` through every call; there is no
//! ambient tenant state anywhere in the pipeline.

pub mod gate;
pub mod ingestor;

pub use gate::{GateDecisionEngine, GateOutcome, GateRead};
pub use ingestor::{EventIngestor, IngestError, IngestOutcome, IngestRequest};
