use mediastore_config::{Config, StorageBackend as StorageBackendType};
use mediastore_storage::{CloudinaryProvider, LocalBackend, StorageProvider};
#[cfg(feature = "s3")]
use mediastore_storage::S3Backend;
use anyhow::Result;
use std::sync::Arc;

/// Binds the single provider used for the lifetime of the process
pub async fn initialize(config: &Config) -> Result<Arc<dyn StorageProvider>> {
    match config.storage.backend {
        StorageBackendType::Cloudinary => {
            let provider = CloudinaryProvider::from_settings(&config.storage.cloudinary)?;
            Ok(Arc::new(provider) as Arc<dyn StorageProvider>)
        }
        StorageBackendType::Local => {
            let backend = LocalBackend::from_settings(&config.storage.local);
            tracing::info!(
                "Initialized local storage backend: path={}, url={}",
                config.storage.local.base_path,
                config.storage.local.base_url
            );
            Ok(Arc::new(backend) as Arc<dyn StorageProvider>)
        }
        #[cfg(feature = "s3")]
        StorageBackendType::S3 => {
            let backend = S3Backend::new(&config.storage.s3).await?;
            Ok(Arc::new(backend) as Arc<dyn StorageProvider>)
        }
        #[cfg(not(feature = "s3"))]
        StorageBackendType::S3 => {
            anyhow::bail!(
                "S3 backend selected but not compiled. Rebuild with --features s3 to enable S3 support.\n\
                Note: S3 support requires cmake to be installed on your system."
            )
        }
    }
}
