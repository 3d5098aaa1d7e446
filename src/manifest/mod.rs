pub mod finalizer;

pub use finalizer::{MANIFEST_FILE, ManifestFinalizer, RESERVATION_VERSION};
