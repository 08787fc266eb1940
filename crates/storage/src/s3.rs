use crate::backend::StorageProvider;
use crate::naming::{effective_filename, resolve_extension};
use crate::UploadError;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client};
use bytes::Bytes;
use mediastore_config::S3Settings;
use mediastore_models::{ResourceKind, UploadOptions, UploadResult};
use mediastore_utils::{compute_sha1_bytes, join_key, validate_key};

/// S3-compatible storage backend
/// Compatible with: Cloudflare R2, AWS S3, MinIO, DigitalOcean Spaces, etc.
///
/// Deleting a key that does not exist succeeds, as `DeleteObject` does.
pub struct S3Backend {
    client: Client,
    bucket_name: String,
    public_url: String,
    bucket_prefix: String,
}

impl S3Backend {
    pub async fn new(settings: &S3Settings) -> Result<Self, UploadError> {
        if settings.bucket_name.trim().is_empty() {
            return Err(UploadError::ConfigError("S3 bucket name is empty".to_string()));
        }

        let credentials = Credentials::new(
            settings.access_key_id.clone(),
            settings.secret_access_key.clone(),
            None,
            None,
            "mediastore-s3",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(settings.region.clone()))
            .endpoint_url(settings.endpoint_url.clone())
            .load()
            .await;

        tracing::info!(
            "Initialized S3 storage backend: bucket={}, endpoint={}",
            settings.bucket_name,
            settings.endpoint_url
        );

        Ok(Self {
            client: Client::new(&config),
            bucket_name: settings.bucket_name.clone(),
            public_url: settings.public_url.trim_end_matches('/').to_string(),
            bucket_prefix: settings.bucket_prefix.clone(),
        })
    }

    fn build_key(&self, kind: ResourceKind, public_id: &str) -> Result<String, UploadError> {
        object_key(&self.bucket_prefix, kind, public_id)
    }

    async fn put(
        &self,
        kind: ResourceKind,
        public_id: String,
        payload: Bytes,
        content_type: String,
    ) -> Result<UploadResult, UploadError> {
        let key = self.build_key(kind, &public_id)?;

        tracing::info!("Uploading {} to S3 bucket {}", key, self.bucket_name);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(payload))
            .send()
            .await
            .map_err(|e| UploadError::S3SdkError(format!("{}: {}", key, DisplayErrorContext(&e))))?;

        let url = format!("{}/{}", self.public_url, key);
        tracing::info!("Upload complete: {}", url);

        Ok(UploadResult::new(url, Some(public_id)))
    }
}

/// `{prefix}/{kind}/{public_id}`, with an empty prefix omitted
fn object_key(prefix: &str, kind: ResourceKind, public_id: &str) -> Result<String, UploadError> {
    validate_key(public_id)?;
    Ok(join_key(&[prefix, kind.as_str(), public_id]))
}

fn content_type_for(options: &UploadOptions, name: &str) -> String {
    options
        .mimetype()
        .map(str::to_string)
        .unwrap_or_else(|| mime_guess::from_path(name).first_or_octet_stream().to_string())
}

#[async_trait::async_trait]
impl StorageProvider for S3Backend {
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
        let content_type = content_type_for(&options, &name);

        self.put(ResourceKind::Image, public_id, payload, content_type).await
    }

    async fn upload_file(
        &self,
        payload: Bytes,
        options: UploadOptions,
    ) -> Result<UploadResult, UploadError> {
        let ext = resolve_extension(options.mimetype());
        let name = effective_filename(options.filename(), ext);
        let public_id = join_key(&[options.folder().unwrap_or_default(), name.as_str()]);
        let content_type = content_type_for(&options, &name);

        self.put(ResourceKind::Raw, public_id, payload, content_type).await
    }

    async fn delete(&self, public_id: &str, kind: ResourceKind) -> Result<(), UploadError> {
        let key = self.build_key(kind, public_id)?;

        tracing::info!("Deleting {} from S3 bucket {}", key, self.bucket_name);

        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .send()
            .await
            .map_err(|e| UploadError::S3SdkError(format!("{}: {}", key, DisplayErrorContext(&e))))?;

        tracing::info!("Delete complete: {}", key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
