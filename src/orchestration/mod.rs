//! Orchestration layer for name reservation
//!
//! High-level pipeline driver plus the persistent reservation log.

pub mod recorder;
pub mod reserver;

// Re-export main types for convenience
pub use recorder::{LOG_FILE, OutcomeRecorder};
pub use reserver::{PackageReserver, ReservationReport, ReserveOptions};
