/// Default values for configuration fields

pub fn storage_backend() -> super::models::StorageBackend {
    super::models::StorageBackend::Local
}

pub fn storage_settings() -> super::models::StorageSettings {
    super::models::StorageSettings {
        backend: storage_backend(),
        cloudinary: cloudinary_settings(),
        local: local_settings(),
        s3: s3_settings(),
    }
}

// Cloudinary defaults
pub fn cloudinary_api_base_url() -> String {
    "https://api.cloudinary.com".to_string()
}

pub fn cloudinary_timeout_secs() -> u64 {
    60
}

pub fn cloudinary_settings() -> super::models::CloudinarySettings {
    super::models::CloudinarySettings {
        cloud_name: String::new(),
        api_key: String::new(),
        api_secret: String::new(),
        api_base_url: cloudinary_api_base_url(),
        timeout_secs: cloudinary_timeout_secs(),
    }
}

// Local filesystem defaults
pub fn local_base_path() -> String {
    "media".to_string()
}

pub fn local_base_url() -> String {
    "http://localhost:8080/media".to_string()
}

pub fn local_settings() -> super::models::LocalSettings {
    super::models::LocalSettings {
        base_path: local_base_path(),
        base_url: local_base_url(),
    }
}

// S3 defaults
pub fn s3_region() -> String {
    "auto".to_string()
}

pub fn s3_bucket_name() -> String {
    "mediastore".to_string()
}

pub fn s3_settings() -> super::models::S3Settings {
    super::models::S3Settings {
        endpoint_url: String::new(),
        region: s3_region(),
        access_key_id: String::new(),
        secret_access_key: String::new(),
        bucket_name: s3_bucket_name(),
        public_url: String::new(),
        bucket_prefix: String::new(),
    }
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# mediastore Configuration
# ===============================================================================

[storage]
backend = "local"                    # Storage backend: "cloudinary", "local" or "s3"

# ===============================================================================
# CLOUDINARY
# ===============================================================================
# Credentials can also be supplied through CLOUDINARY_CLOUD_NAME,
# CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET
[storage.cloudinary]
cloud_name = ""                      # Cloudinary cloud (account) name
api_key = ""                         # API key
api_secret = ""                      # API secret
api_base_url = "https://api.cloudinary.com"
timeout_secs = 60                    # HTTP request timeout in seconds

# ===============================================================================
# LOCAL FILESYSTEM
# ===============================================================================
[storage.local]
base_path = "media"                  # Root directory for stored assets
base_url = "http://localhost:8080/media"  # Public URL the root directory is served from

# ===============================================================================
# S3 (only used if backend = "s3", requires the "s3" feature)
# ===============================================================================
[storage.s3]
endpoint_url = ""                    # S3 endpoint (e.g., https://s3.amazonaws.com)
region = "auto"                      # S3 region (e.g., us-east-1 or "auto")
access_key_id = ""                   # Access Key ID
secret_access_key = ""               # Secret Access Key
bucket_name = "mediastore"           # Bucket name
public_url = ""                      # Public URL for stored assets
bucket_prefix = ""                   # Prefix for all keys (optional)
"#;
