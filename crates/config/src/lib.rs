mod models;
mod defaults;
mod loader;
mod migration;
mod errors;

pub use models::*;
pub use errors::ConfigError;
pub use defaults::DEFAULT_CONFIG_TEMPLATE;
pub use loader::{
    ENV_CLOUDINARY_API_KEY, ENV_CLOUDINARY_API_SECRET, ENV_CLOUDINARY_CLOUD_NAME,
    ENV_STORAGE_BACKEND,
};
