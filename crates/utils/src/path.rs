use crate::UtilsError;
use std::path::Path;

/// Joins key segments with `/`, skipping blank segments and trimming stray slashes
pub fn join_key(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim().trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Rejects keys that would escape their storage root
pub fn validate_key(key: &str) -> Result<(), UtilsError> {
    if key.trim().is_empty() {
        return Err(UtilsError::PathError("empty key".to_string()));
    }
    if key.starts_with('/') || key.contains('\\') {
        return Err(UtilsError::PathError(key.to_string()));
    }
    if key.split('/').any(|segment| segment == ".." || segment == ".") {
        return Err(UtilsError::PathError(key.to_string()));
    }
    Ok(())
}

pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
