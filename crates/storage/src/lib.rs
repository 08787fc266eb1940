mod backend;
mod cloudinary;
mod errors;
mod local;
mod naming;

#[cfg(feature = "s3")]
mod s3;

pub use backend::StorageProvider;
pub use cloudinary::{CloudinaryCredentials, CloudinaryProvider};
pub use errors::UploadError;
pub use local::LocalBackend;
pub use naming::{effective_filename, resolve_extension, DEFAULT_BASENAME, DEFAULT_EXTENSION};

pub use mediastore_models::{ResourceKind, UploadOptions, UploadResult};

#[cfg(feature = "s3")]
pub use s3::S3Backend;
