pub mod npm;

pub use npm::{NPMRC_FILE, NpmRegistry, PublishFailureKind, classify_failure};
