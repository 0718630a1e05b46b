pub use crate::api::error::DBError;

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("Database error: {0}")]
    DB(#[from] DBError),
    #[error("A student with identifier {0} is already stored")]
    DuplicateIdentifier(String),
    #[error("{matches} students share identifier {id}")]
    AmbiguousIdentifier { id: String, matches: usize },
}
