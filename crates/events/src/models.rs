use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { backend: String },
    ConfigCreated { path: String },
    ConfigMigrated { added_fields: Vec<String> },

    // Storage
    ProviderReady { backend: String },
    UploadStarted { target: String, bytes: usize },
    UploadCompleted { url: String, public_id: Option<String> },
    AssetDeleted { public_id: String, kind: String },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    pub(super) silent_mode: bool,
}
