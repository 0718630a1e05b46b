pub use crate::core::error::StorageError;

#[derive(thiserror::Error, Debug)]
pub enum DBError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Document conversion error: {0}")]
    Convert(#[source] serde_json::Error),
    #[error("Document must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
