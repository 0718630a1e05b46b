//! Errors returned by functions in the [`crate::core`] module.

use std::io;

/// An error type for `mod storage`.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    IOError(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid file: {0}")]
    InvalidFile(Box<str>),
    #[error("Indent of {0} spaces exceeds the maximum of 16")]
    IndentTooWide(usize),
}
