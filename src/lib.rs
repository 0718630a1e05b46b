//! # gradebook-db
//!
//! Student grade records kept in a single human-readable JSON file.
//!
//! The crate has two layers. The lower one is a small embedded document
//! store: a [`DB`] holds named [`Table`]s of schema-less JSON documents,
//! selected with single-field equality [`Query`]s. The upper one is the
//! [`RecordStore`], which maps [`Student`]s and their [`Grade`]s to and
//! from documents.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use gradebook_db::{Grade, RecordStore, RecordError, StoreConfig, Student};
//! # fn main() -> Result<(), RecordError> {
//! let store = RecordStore::new(StoreConfig::new("/path/to/db.json"));
//!
//! let juan = Student::new("47526381", "Juan", vec![Grade::new("Programación 1", 6)]);
//! store.insert(&juan)?;
//!
//! // Each call opens the file, does its work and releases it.
//! if let Some(mut juan) = store.find_by_identifier("47526381")? {
//!     juan.grades.push(Grade::new("Base de datos", 8));
//!     store.update(&juan)?;
//! }
//! store.delete_by_identifier("47526381")?;
//! # Ok(())
//! # }
//! ```
//!
//! The document store can also be used directly:
//!
//! ```rust,no_run
//! # use gradebook_db::{DB, Query, Result};
//! # use serde_json::json;
//! # fn main() -> Result<()> {
//! let db = DB::open("/path/to/db.json")?;
//! let table = db.table("estudiantes");
//! table.insert_value(&json!({"dni": "43796248", "nombre": "Pedro"}))?;
//! for doc in table.search(&Query::field("dni").equals("43796248"))? {
//!     println!("{}: {:?}", doc.id(), doc.fields());
//! }
//! db.close()?;
//! # Ok(())
//! # }
//! ```
mod api;
mod core;
mod records;

pub use crate::core::consts;
pub use api::error::{DBError, StorageError};
pub use api::*;
pub use records::{
    DuplicatePolicy, Grade, MatchPolicy, RECORDS_TABLE, RecordStore, StoreConfig, Student,
    error::RecordError,
};
