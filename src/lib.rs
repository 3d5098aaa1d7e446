pub mod core;
pub mod manifest;
pub mod orchestration;
pub mod registry;
pub mod security;
pub mod staging;

pub use core::*;
pub use manifest::{ManifestFinalizer, RESERVATION_VERSION};
pub use orchestration::{OutcomeRecorder, PackageReserver, ReservationReport, ReserveOptions};
pub use registry::{NpmRegistry, PublishFailureKind};
pub use security::SecureTokenManager;
pub use staging::{
    PlaceholderSubstitutor, PublishPruner, ReplacementMap, StagedWorkspace, WorkspaceStager,
};
