pub mod error;

use std::{
    ops::Deref,
    path::{Path, PathBuf},
    rc::Rc,
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::core::{
    consts,
    error::StorageError,
    storage::JsonStorage,
    tables::{self, TableData, Tables},
};
pub use crate::core::{
    query::{Field, Query},
    tables::{DocId, Fields},
};
use error::DBError;

pub type Result<T> = std::result::Result<T, DBError>;

/// Configures and opens a [`DB`].
#[derive(Debug, Clone)]
pub struct DBBuilder {
    path: PathBuf,
    indent: usize,
    default_table: String,
    create_dirs: bool,
}

impl DBBuilder {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        DBBuilder {
            path: path.as_ref().to_path_buf(),
            indent: consts::DEFAULT_INDENT,
            default_table: consts::DEFAULT_TABLE.to_owned(),
            create_dirs: false,
        }
    }

    /// Spaces per nesting level in the written file. [`build`](Self::build)
    /// fails with [`StorageError::IndentTooWide`] above
    /// [`consts::MAX_INDENT`].
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// The table returned by [`DB::default_table`].
    pub fn default_table(mut self, name: impl Into<String>) -> Self {
        self.default_table = name.into();
        self
    }

    /// Create missing parent directories of the database file.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    pub fn build(self) -> Result<DB> {
        let storage = JsonStorage::open_or_create(&self.path, self.indent, self.create_dirs)?;
        debug!(path = %self.path.display(), "opened database");
        Ok(DB {
            storage,
            default_table: self.default_table.into(),
            path: self.path,
        })
    }
}

/// A connection to a single-file JSON document database.
///
/// Every write goes to a synced tmp file that is then renamed over the
/// database file, so the file always holds the last complete write and
/// dropping a `DB` loses nothing. [`DB::close`] syncs once more and reports
/// errors.
pub struct DB {
    storage: JsonStorage,
    default_table: Rc<str>,
    path: PathBuf,
}

impl DB {
    /// Opens or creates a database at `path` with default settings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        DBBuilder::new(path).build()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self, name: &str) -> Table<'_> {
        Table {
            db: self,
            name: name.into(),
        }
    }

    pub fn default_table(&self) -> Table<'_> {
        Table {
            db: self,
            name: Rc::clone(&self.default_table),
        }
    }

    /// Names of the tables present in the file, sorted.
    pub fn tables(&self) -> Result<Vec<String>> {
        Ok(self.read()?.names().map(str::to_owned).collect())
    }

    /// Removes a table and all its documents. Returns whether it existed.
    pub fn drop_table(&self, name: &str) -> Result<bool> {
        let dropped = self.modify(|tables| tables.remove(name))?;
        debug!(table = name, dropped, "dropped table");
        Ok(dropped)
    }

    pub fn drop_tables(&self) -> Result<()> {
        self.modify(Tables::clear)?;
        debug!("dropped all tables");
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.storage.sync()?;
        debug!(path = %self.path.display(), "closed database");
        Ok(())
    }

    fn read(&self) -> Result<Tables> {
        Ok(self.storage.read()?)
    }

    /// Reads the database, applies `f`, and writes the result back.
    fn modify<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T> {
        self.try_modify(|tables| Ok(f(tables)))
    }

    /// Like [`DB::modify`], but nothing is written if `f` fails.
    fn try_modify<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> std::result::Result<T, StorageError>,
    ) -> Result<T> {
        let mut tables = self.storage.read()?;
        let out = f(&mut tables)?;
        self.storage.write(&tables)?;
        Ok(out)
    }
}

/// A stored document: its fields plus the id it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: DocId,
    fields: Fields,
}

impl Deref for Document {
    type Target = Fields;
    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl Document {
    pub fn id(&self) -> DocId {
        self.id
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Decodes the document's fields into `T`. Fields `T` does not know
    /// about are ignored unless `T` says otherwise.
    pub fn deserialize_into<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(Value::Object(self.fields)).map_err(DBError::Convert)
    }
}

/// Converts a serializable value into document fields. The value must
/// serialize to a JSON object.
pub fn to_fields<T: Serialize + ?Sized>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value).map_err(DBError::Convert)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DBError::NotAnObject(kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A named table within a [`DB`].
///
/// A table that has never been written to reads as empty; the first write
/// creates it in the file.
pub struct Table<'db> {
    db: &'db DB,
    name: Rc<str>,
}

impl Table<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a document and returns its id.
    pub fn insert(&self, fields: Fields) -> Result<DocId> {
        let id = self.db.try_modify(|tables| {
            let table = tables.table_mut(&self.name);
            let id = tables::next_id(table)?;
            table.insert(id, fields);
            Ok(id)
        })?;
        debug!(table = %self.name, doc_id = %id, "inserted document");
        Ok(id)
    }

    /// Serializes `value` and appends it as a document.
    pub fn insert_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<DocId> {
        self.insert(to_fields(value)?)
    }

    /// Appends several documents in one write. If ids run out partway,
    /// none of them are stored.
    pub fn insert_multiple<I>(&self, docs: I) -> Result<Vec<DocId>>
    where
        I: IntoIterator<Item = Fields>,
    {
        let ids = self.db.try_modify(|tables| {
            let table = tables.table_mut(&self.name);
            docs.into_iter()
                .map(|fields| {
                    let id = tables::next_id(table)?;
                    table.insert(id, fields);
                    Ok(id)
                })
                .collect::<std::result::Result<Vec<_>, StorageError>>()
        })?;
        debug!(table = %self.name, inserted = ids.len(), "inserted documents");
        Ok(ids)
    }

    /// All documents, in insertion order.
    pub fn all(&self) -> Result<Vec<Document>> {
        self.scan(|table| {
            table
                .iter()
                .map(|(id, fields)| Document {
                    id: *id,
                    fields: fields.clone(),
                })
                .collect()
        })
    }

    /// All documents matching `query`, in insertion order.
    pub fn search(&self, query: &Query) -> Result<Vec<Document>> {
        let docs: Vec<_> = self.scan(|table| {
            table
                .iter()
                .filter(|(_, fields)| query.matches(fields))
                .map(|(id, fields)| Document {
                    id: *id,
                    fields: fields.clone(),
                })
                .collect()
        })?;
        debug!(
            table = %self.name,
            field = query.field_name(),
            matched = docs.len(),
            "searched table"
        );
        Ok(docs)
    }

    /// The first document matching `query`.
    pub fn get(&self, query: &Query) -> Result<Option<Document>> {
        self.scan(|table| {
            table
                .iter()
                .find(|(_, fields)| query.matches(fields))
                .map(|(id, fields)| Document {
                    id: *id,
                    fields: fields.clone(),
                })
        })
    }

    pub fn get_by_id(&self, id: DocId) -> Result<Option<Document>> {
        self.scan(|table| {
            table.get(&id).map(|fields| Document {
                id,
                fields: fields.clone(),
            })
        })
    }

    pub fn contains(&self, query: &Query) -> Result<bool> {
        self.scan(|table| table.values().any(|fields| query.matches(fields)))
    }

    pub fn count(&self, query: &Query) -> Result<usize> {
        self.scan(|table| table.values().filter(|fields| query.matches(fields)).count())
    }

    pub fn len(&self) -> Result<usize> {
        self.scan(TableData::len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.scan(TableData::is_empty)
    }

    /// Merges `fields` into every document matching `query`, replacing the
    /// values of fields that already exist. Without a query, every document
    /// in the table is updated. Returns the ids of updated documents.
    pub fn update(&self, fields: &Fields, query: Option<&Query>) -> Result<Vec<DocId>> {
        let ids = self.db.modify(|tables| {
            let table = tables.table_mut(&self.name);
            let mut ids = Vec::new();
            for (id, doc) in table.iter_mut() {
                if query.is_none_or(|q| q.matches(doc)) {
                    doc.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                    ids.push(*id);
                }
            }
            ids
        })?;
        debug!(table = %self.name, updated = ids.len(), "updated documents");
        Ok(ids)
    }

    /// Removes every document matching `query`. Returns the removed ids.
    pub fn remove(&self, query: &Query) -> Result<Vec<DocId>> {
        let ids = self.db.modify(|tables| {
            let table = tables.table_mut(&self.name);
            let ids: Vec<_> = table
                .iter()
                .filter(|(_, fields)| query.matches(fields))
                .map(|(id, _)| *id)
                .collect();
            for id in &ids {
                table.remove(id);
            }
            ids
        })?;
        debug!(table = %self.name, removed = ids.len(), "removed documents");
        Ok(ids)
    }

    /// Removes documents by id. Ids not present are skipped; the ids that
    /// were actually removed are returned.
    pub fn remove_ids(&self, ids: &[DocId]) -> Result<Vec<DocId>> {
        let removed = self.db.modify(|tables| {
            let table = tables.table_mut(&self.name);
            ids.iter()
                .copied()
                .filter(|id| table.remove(id).is_some())
                .collect::<Vec<_>>()
        })?;
        debug!(table = %self.name, removed = removed.len(), "removed documents by id");
        Ok(removed)
    }

    /// Removes all documents. The next inserted document gets id 1.
    pub fn truncate(&self) -> Result<()> {
        self.db.modify(|tables| tables.table_mut(&self.name).clear())?;
        debug!(table = %self.name, "truncated table");
        Ok(())
    }

    fn scan<T>(&self, f: impl FnOnce(&TableData) -> T) -> Result<T> {
        let tables = self.db.read()?;
        Ok(match tables.table(&self.name) {
            Some(table) => f(table),
            None => f(&TableData::new()),
        })
    }
}
