use crate::UploadError;
use bytes::Bytes;
use mediastore_models::{ResourceKind, UploadOptions, UploadResult};

/// Capability set every media storage backend provides.
///
/// Application code holds an `Arc<dyn StorageProvider>` bound once at startup and
/// never names a concrete backend. Implementations do not retry; a failed call
/// surfaces the backend's error to the caller unchanged.
#[async_trait::async_trait]
pub trait StorageProvider: Send + Sync {
    /// Stores `payload` as an image asset
    async fn upload_image(
        &self,
        payload: Bytes,
        options: UploadOptions,
    ) -> Result<UploadResult, UploadError>;

    /// Stores `payload` as a raw file. The stored name always carries an
    /// extension inferred from `options.mimetype`, appended only when the
    /// caller's filename does not already end with it.
    async fn upload_file(
        &self,
        payload: Bytes,
        options: UploadOptions,
    ) -> Result<UploadResult, UploadError>;

    /// Deletes a previously uploaded asset. `kind` must match the kind the asset
    /// was stored under. Behavior for unknown ids is documented per backend.
    async fn delete(&self, public_id: &str, kind: ResourceKind) -> Result<(), UploadError>;

    /// Short backend label for logs
    fn name(&self) -> &'static str;
}
