//! Student grade records on top of the document store.
//!
//! A [`Student`] is stored as one document in the [`RECORDS_TABLE`] table,
//! with its [`Grade`]s embedded inline:
//!
//! ```ignore
//! {
//!     "dni": "46193480",
//!     "nombre": "María",
//!     "notas": [
//!         { "materia": "Programación 1", "nota": 8 },
//!         { "materia": "Programación 2", "nota": 6 }
//!     ]
//! }
//! ```
//!
//! [`RecordStore`] holds only its [`StoreConfig`]. Every operation opens its
//! own [`DB`] connection and releases it before returning, whether the
//! operation succeeded or not. No state is carried between operations and
//! writes are not atomic across operations.
pub mod config;
pub mod error;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{DB, DBBuilder, Query, Table, to_fields};
pub use config::{DuplicatePolicy, MatchPolicy, RECORDS_TABLE, StoreConfig};
use error::{DBError, RecordError};

type Result<T> = std::result::Result<T, RecordError>;

/// The document field holding a student's identifier.
const ID_FIELD: &str = "dni";

/// A score in one subject. Always owned by a [`Student`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grade {
    #[serde(rename = "materia")]
    pub subject: String,
    #[serde(rename = "nota")]
    pub score: i64,
}

impl Grade {
    pub fn new(subject: impl Into<String>, score: i64) -> Self {
        Grade {
            subject: subject.into(),
            score,
        }
    }
}

/// A student, keyed by national identifier (DNI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "dni")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "notas")]
    pub grades: Vec<Grade>,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, grades: Vec<Grade>) -> Self {
        Student {
            id: id.into(),
            name: name.into(),
            grades,
        }
    }
}

fn by_id(id: &str) -> Query {
    Query::field(ID_FIELD).equals(id)
}

/// Insert, list, find, delete and update [`Student`] records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
}

impl RecordStore {
    pub fn new(config: StoreConfig) -> Self {
        RecordStore { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Stores `student` and returns it as read back from its stored form.
    ///
    /// Under [`DuplicatePolicy::Allow`] a second student with the same
    /// identifier is stored as a separate record.
    pub fn insert(&self, student: &Student) -> Result<Student> {
        self.with_table(|table| {
            if self.config.duplicate_policy == DuplicatePolicy::Reject
                && table.contains(&by_id(&student.id))?
            {
                return Err(RecordError::DuplicateIdentifier(student.id.clone()));
            }
            let fields = to_fields(student)?;
            let doc_id = table.insert(fields.clone())?;
            debug!(dni = %student.id, %doc_id, "inserted student");
            Ok(serde_json::from_value::<Student>(fields.into()).map_err(DBError::Convert)?)
        })
    }

    /// All stored students, in insertion order.
    pub fn list_all(&self) -> Result<Vec<Student>> {
        self.with_table(|table| {
            table
                .all()?
                .into_iter()
                .map(|doc| doc.deserialize_into::<Student>().map_err(RecordError::from))
                .collect()
        })
    }

    /// The student stored under `id`, or `None`. Which record is returned
    /// when several share `id` is decided by the configured
    /// [`MatchPolicy`].
    pub fn find_by_identifier(&self, id: &str) -> Result<Option<Student>> {
        let matches = self.with_table(|table| Ok(table.search(&by_id(id))?))?;
        if matches.len() > 1 {
            warn!(dni = id, matches = matches.len(), "several students share one identifier");
        }
        self.config
            .match_policy
            .select(id, matches)?
            .map(|doc| doc.deserialize_into::<Student>().map_err(RecordError::from))
            .transpose()
    }

    /// Removes every student stored under `id`. Removing an unknown
    /// identifier is not an error.
    pub fn delete_by_identifier(&self, id: &str) -> Result<()> {
        self.with_table(|table| {
            let removed = table.remove(&by_id(id))?;
            debug!(dni = id, removed = removed.len(), "deleted students");
            Ok(())
        })
    }

    /// Overwrites the name and grades of every record stored under
    /// `student.id`. The grade list is replaced as a whole. An unknown
    /// identifier updates nothing and is not an error.
    pub fn update(&self, student: &Student) -> Result<Student> {
        self.with_table(|table| {
            let updated = table.update(&to_fields(student)?, Some(&by_id(&student.id)))?;
            debug!(dni = %student.id, updated = updated.len(), "updated students");
            Ok(())
        })?;
        Ok(student.clone())
    }

    /// Removes every stored student.
    pub fn truncate(&self) -> Result<()> {
        self.with_table(|table| Ok(table.truncate()?))
    }

    /// Number of stored records, duplicates included.
    pub fn len(&self) -> Result<usize> {
        self.with_table(|table| Ok(table.len()?))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.with_table(|table| Ok(table.is_empty()?))
    }

    fn connect(&self) -> Result<DB> {
        Ok(DBBuilder::new(&self.config.path)
            .indent(self.config.indent)
            .default_table(self.config.table.as_str())
            .create_dirs(self.config.create_dirs)
            .build()?)
    }

    /// Runs `f` against the records table on a fresh connection. On success
    /// the connection is closed so release errors surface; on failure it is
    /// dropped.
    fn with_table<T>(&self, f: impl FnOnce(&Table<'_>) -> Result<T>) -> Result<T> {
        let db = self.connect()?;
        let out = f(&db.default_table())?;
        db.close()?;
        Ok(out)
    }
}
