use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Public HTTPS address of the stored asset, never empty
    pub url: String,
    /// Backend-assigned identifier, needed to delete the asset later
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl UploadResult {
    pub fn new(url: impl Into<String>, public_id: Option<String>) -> Self {
        Self {
            url: url.into(),
            public_id,
        }
    }
}

/// Backend-agnostic upload hints supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    /// Folder hint, blank values count as absent
    pub fn folder(&self) -> Option<&str> {
        non_blank(&self.folder)
    }

    /// Filename hint, blank values count as absent
    pub fn filename(&self) -> Option<&str> {
        non_blank(&self.filename)
    }

    /// MIME type hint, blank values count as absent
    pub fn mimetype(&self) -> Option<&str> {
        non_blank(&self.mimetype)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// How the backend treats a payload. Deletion must target the kind the asset was stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Raw,
    Auto,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Raw => "raw",
            ResourceKind::Auto => "auto",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(ResourceKind::Image),
            "raw" => Ok(ResourceKind::Raw),
            "auto" => Ok(ResourceKind::Auto),
            other => Err(format!("unknown resource kind '{}'", other)),
        }
    }
}
