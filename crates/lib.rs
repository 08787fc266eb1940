// Re-export all public APIs from the workspace crates

pub use mediastore_models::*;
pub use mediastore_events::*;
pub use mediastore_utils::*;
pub use mediastore_config::*;
pub use mediastore_storage::*;

/// Prelude module for convenient imports
pub mod prelude {
    // Core models
    pub use mediastore_models::{ResourceKind, UploadOptions, UploadResult};

    // Storage
    pub use mediastore_storage::{CloudinaryProvider, LocalBackend, StorageProvider, UploadError};

    // Events
    pub use mediastore_events::{AppEvent, EventBus};

    // Configuration
    pub use mediastore_config::Config;
}
