//! Storage provider backed by Cloudinary's upload API.
//!
//! Images are stored under resource type `image` with the caller's filename as
//! public id. Raw files are stored under `raw` with an extension-bearing public
//! id (see [`crate::naming`]). Deleting an id the service does not know fails
//! with [`UploadError::NotFound`].

mod api;

use crate::backend::StorageProvider;
use crate::naming::{effective_filename, resolve_extension};
use crate::UploadError;
use api::{CloudinaryApi, HttpApi, UploadRequest};
use bytes::Bytes;
use mediastore_config::CloudinarySettings;
use mediastore_models::{ResourceKind, UploadOptions, UploadResult};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Account binding, fixed for the lifetime of the process
#[derive(Clone)]
pub struct CloudinaryCredentials {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryCredentials {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, UploadError> {
        let credentials = Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        };

        for (field, value) in [
            ("cloud_name", &credentials.cloud_name),
            ("api_key", &credentials.api_key),
            ("api_secret", &credentials.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(UploadError::ConfigError(format!("Cloudinary {} is empty", field)));
            }
        }

        Ok(credentials)
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl TryFrom<&CloudinarySettings> for CloudinaryCredentials {
    type Error = UploadError;

    fn try_from(settings: &CloudinarySettings) -> Result<Self, Self::Error> {
        Self::new(
            settings.cloud_name.clone(),
            settings.api_key.clone(),
            settings.api_secret.clone(),
        )
    }
}

pub struct CloudinaryProvider {
    api: Arc<dyn CloudinaryApi>,
}

impl CloudinaryProvider {
    pub fn new(
        credentials: CloudinaryCredentials,
        api_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, UploadError> {
        tracing::info!(
            "Binding Cloudinary provider to cloud '{}' via {}",
            credentials.cloud_name(),
            api_base_url
        );
        let api = HttpApi::new(Arc::new(credentials), api_base_url, timeout)?;
        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn from_settings(settings: &CloudinarySettings) -> Result<Self, UploadError> {
        let credentials = CloudinaryCredentials::try_from(settings)?;
        Self::new(
            credentials,
            &settings.api_base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub(crate) fn with_api(api: Arc<dyn CloudinaryApi>) -> Self {
        Self { api }
    }

    async fn upload(&self, request: UploadRequest, payload: Bytes) -> Result<UploadResult, UploadError> {
        let target = request.target();
        let kind = request.kind;
        let api = Arc::clone(&self.api);

        // The join handle is the single completion signal. Dropping the caller's
        // future detaches the task; the upload still runs to completion.
        let completion = tokio::spawn(async move { api.upload(request, payload).await });

        let response = match completion.await? {
            Ok(Some(response)) => response,
            Ok(None) => {
                tracing::error!("Cloudinary returned no result for {} upload {}", kind, target);
                return Err(UploadError::MissingResult(target));
            }
            Err(e) => {
                tracing::warn!("Cloudinary {} upload {} failed: {}", kind, target, e);
                return Err(e);
            }
        };

        if response.secure_url.is_empty() {
            return Err(UploadError::MissingResult(target));
        }

        tracing::info!("Uploaded {} {} -> {}", kind, target, response.secure_url);
        Ok(UploadResult::new(
            response.secure_url,
            response.public_id.filter(|id| !id.is_empty()),
        ))
    }
}

#[async_trait::async_trait]
impl StorageProvider for CloudinaryProvider {
    async fn upload_image(
        &self,
        payload: Bytes,
        options: UploadOptions,
    ) -> Result<UploadResult, UploadError> {
        let request = UploadRequest {
            kind: ResourceKind::Image,
            folder: options.folder().map(str::to_string),
            public_id: options.filename().map(str::to_string),
        };
        self.upload(request, payload).await
    }

    async fn upload_file(
        &self,
        payload: Bytes,
        options: UploadOptions,
    ) -> Result<UploadResult, UploadError> {
        let ext = resolve_extension(options.mimetype());
        let request = UploadRequest {
            kind: ResourceKind::Raw,
            folder: options.folder().map(str::to_string),
            public_id: Some(effective_filename(options.filename(), ext)),
        };
        self.upload(request, payload).await
    }

    async fn delete(&self, public_id: &str, kind: ResourceKind) -> Result<(), UploadError> {
        let response = self.api.destroy(public_id, kind).await?;

        match response.result.as_str() {
            "ok" => {
                tracing::info!("Deleted {} {}", kind, public_id);
                Ok(())
            }
            "not found" => Err(UploadError::NotFound(public_id.to_string())),
            other => Err(UploadError::rejected(public_id, 200, other)),
        }
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}
