use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Backend rejected '{target}' (status {status}): {message}")]
    Rejected {
        target: String,
        status: u16,
        message: String,
    },

    #[error("Backend reported success but returned no result for '{0}'")]
    MissingResult(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid asset identifier: {0}")]
    InvalidKey(String),

    #[error("Upload task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Invalid storage configuration: {0}")]
    ConfigError(String),

    #[cfg(feature = "s3")]
    #[error("S3 SDK error: {0}")]
    S3SdkError(String),
}

impl UploadError {
    pub fn rejected(target: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        UploadError::Rejected {
            target: target.into(),
            status,
            message: message.into(),
        }
    }

    /// True when the backend claimed success without handing back a usable result
    pub fn is_missing_result(&self) -> bool {
        matches!(self, UploadError::MissingResult(_))
    }
}

impl From<mediastore_utils::UtilsError> for UploadError {
    fn from(err: mediastore_utils::UtilsError) -> Self {
        match err {
            mediastore_utils::UtilsError::PathError(key) => UploadError::InvalidKey(key),
        }
    }
}
