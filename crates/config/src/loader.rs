use super::defaults::{storage_settings, DEFAULT_CONFIG_TEMPLATE};
use super::errors::ConfigError;
use super::migration::migrate_config_if_needed;
use super::models::{Config, StorageBackend};
use std::path::Path;
use std::sync::Arc;

type Result<T> = std::result::Result<T, ConfigError>;

pub const ENV_STORAGE_BACKEND: &str = "MEDIASTORE_STORAGE_BACKEND";
pub const ENV_CLOUDINARY_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_CLOUDINARY_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const ENV_CLOUDINARY_API_SECRET: &str = "CLOUDINARY_API_SECRET";

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: storage_settings(),
        }
    }
}

impl Config {
    /// Loads configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_with_events(path, None).await
    }

    /// Loads configuration from a file with optional event bus for notifications.
    ///
    /// Environment overrides are applied after parsing, then the result is validated.
    pub async fn from_file_with_events<P: AsRef<Path>>(
        path: P,
        events: Option<&Arc<mediastore_events::EventBus>>,
    ) -> Result<Self> {
        let path = path.as_ref();

        // Create default config if it doesn't exist
        if !path.exists() {
            create_default_config(path).await?;
        }

        migrate_config_if_needed(path, events).await?;

        let content = tokio::fs::read_to_string(path).await?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides backend selection and Cloudinary credentials from the environment.
    /// Blank values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = non_blank(ENV_STORAGE_BACKEND) {
            match backend.parse::<StorageBackend>() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_STORAGE_BACKEND, e),
            }
        }

        let cloudinary = &mut self.storage.cloudinary;
        if let Some(value) = non_blank(ENV_CLOUDINARY_CLOUD_NAME) {
            cloudinary.cloud_name = value;
        }
        if let Some(value) = non_blank(ENV_CLOUDINARY_API_KEY) {
            cloudinary.api_key = value;
        }
        if let Some(value) = non_blank(ENV_CLOUDINARY_API_SECRET) {
            cloudinary.api_secret = value;
        }
    }

    /// Checks that the selected backend has everything it needs
    pub fn validate(&self) -> Result<()> {
        match self.storage.backend {
            StorageBackend::Cloudinary => {
                let c = &self.storage.cloudinary;
                require("storage.cloudinary.cloud_name", &c.cloud_name)?;
                require("storage.cloudinary.api_key", &c.api_key)?;
                require("storage.cloudinary.api_secret", &c.api_secret)?;
                if !c.api_base_url.starts_with("http://") && !c.api_base_url.starts_with("https://") {
                    return Err(ConfigError::InvalidConfig(format!(
                        "storage.cloudinary.api_base_url must be an http(s) URL, got '{}'",
                        c.api_base_url
                    )));
                }
                if c.timeout_secs == 0 {
                    return Err(ConfigError::InvalidConfig(
                        "storage.cloudinary.timeout_secs must be greater than 0".to_string(),
                    ));
                }
            }
            StorageBackend::Local => {
                let l = &self.storage.local;
                require("storage.local.base_path", &l.base_path)?;
                require("storage.local.base_url", &l.base_url)?;
            }
            StorageBackend::S3 => {
                let s = &self.storage.s3;
                require("storage.s3.endpoint_url", &s.endpoint_url)?;
                require("storage.s3.access_key_id", &s.access_key_id)?;
                require("storage.s3.secret_access_key", &s.secret_access_key)?;
                require("storage.s3.bucket_name", &s.bucket_name)?;
                require("storage.s3.public_url", &s.public_url)?;
            }
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(format!("{} is required", field)));
    }
    Ok(())
}

/// Creates a default configuration file
async fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    tokio::fs::write(path, DEFAULT_CONFIG_TEMPLATE).await?;
    Ok(())
}
