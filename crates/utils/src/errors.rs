use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UtilsError {
    #[error("Invalid path: {0}")]
    PathError(String),
}
