use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "super::defaults::storage_settings")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "super::defaults::storage_backend")]
    pub backend: StorageBackend,
    #[serde(default = "super::defaults::cloudinary_settings")]
    pub cloudinary: CloudinarySettings,
    #[serde(default = "super::defaults::local_settings")]
    pub local: LocalSettings,
    #[serde(default = "super::defaults::s3_settings")]
    pub s3: S3Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Cloudinary,
    Local,
    S3,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Cloudinary => "cloudinary",
            StorageBackend::Local => "local",
            StorageBackend::S3 => "s3",
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(StorageBackend::Cloudinary),
            "local" => Ok(StorageBackend::Local),
            "s3" => Ok(StorageBackend::S3),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Account binding for the hosted media service
#[derive(Clone, Deserialize, Serialize)]
pub struct CloudinarySettings {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "super::defaults::cloudinary_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "super::defaults::cloudinary_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for CloudinarySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinarySettings")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalSettings {
    #[serde(default = "super::defaults::local_base_path")]
    pub base_path: String,
    #[serde(default = "super::defaults::local_base_url")]
    pub base_url: String,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct S3Settings {
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(default = "super::defaults::s3_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    #[serde(default = "super::defaults::s3_bucket_name")]
    pub bucket_name: String,
    #[serde(default)]
    pub public_url: String,
    #[serde(default)]
    pub bucket_prefix: String,
}

impl fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Settings")
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("public_url", &self.public_url)
            .field("bucket_prefix", &self.bucket_prefix)
            .finish()
    }
}
