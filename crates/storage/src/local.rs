use crate::backend::StorageProvider;
use crate::naming::{effective_filename, resolve_extension};
use crate::UploadError;
use bytes::Bytes;
use mediastore_config::LocalSettings;
use mediastore_models::{ResourceKind, UploadOptions, UploadResult};
use mediastore_utils::{compute_sha1_bytes, join_key, normalize_path, validate_key};
use std::path::PathBuf;

/// Local filesystem storage backend.
///
/// Assets live at `{base_path}/{kind}/{public_id}` and are served from
/// `{base_url}/{kind}/{public_id}`. Images uploaded without a filename are keyed
/// by the SHA1 of their content. Deleting an unknown id fails with
/// [`UploadError::NotFound`].
pub struct LocalBackend {
    base_url: String,
    base_path: PathBuf,
}

impl LocalBackend {
    pub fn new(base_url: String, base_path: PathBuf) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            base_path,
        }
    }

    pub fn from_settings(settings: &LocalSettings) -> Self {
        Self::new(settings.base_url.clone(), PathBuf::from(&settings.base_path))
    }

    fn asset_path(&self, kind: ResourceKind, public_id: &str) -> Result<PathBuf, UploadError> {
        validate_key(public_id)?;
        Ok(self.base_path.join(kind.as_str()).join(public_id))
    }

    fn url_for(&self, kind: ResourceKind, public_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.as_str(), public_id)
    }

    async fn store(
        &self,
        kind: ResourceKind,
        public_id: String,
        payload: Bytes,
    ) -> Result<UploadResult, UploadError> {
        let path = self.asset_path(kind, &public_id)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &payload).await?;

        tracing::info!("Stored {} bytes at {}", payload.len(), normalize_path(&path));

        Ok(UploadResult::new(
            self.url_for(kind, &public_id),
            Some(public_id),
        ))
    }
}

#[async_trait::async_trait]
impl StorageProvider for LocalBackend {
    async fn upload_image(
        &self,
        payload: Bytes,
        options: UploadOptions,
    ) -> Result<UploadResult, UploadError> {
        let name = options
            .filename()
            .map(str::to_string)
            .unwrap_or_else(|| compute_sha1_bytes(&payload));
        let public_id = join_key(&[options.folder().unwrap_or_default(), name.as_str()]);

        self.store(ResourceKind::Image, public_id, payload).await
    }

    async fn upload_file(
        &self,
        payload: Bytes,
        options: UploadOptions,
    ) -> Result<UploadResult, UploadError> {
        let ext = resolve_extension(options.mimetype());
        let name = effective_filename(options.filename(), ext);
        let public_id = join_key(&[options.folder().unwrap_or_default(), name.as_str()]);

        self.store(ResourceKind::Raw, public_id, payload).await
    }

    async fn delete(&self, public_id: &str, kind: ResourceKind) -> Result<(), UploadError> {
        let path = self.asset_path(kind, public_id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Deleted {}", normalize_path(&path));
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(UploadError::NotFound(public_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
