//! [`Tables`] is the in-memory image of a database file.
//!
//! The file holds one JSON object keyed by table name. Each table is an
//! object keyed by the stringified [`DocId`] of its documents:
//!
//! ```ignore
//! {
//!     "estudiantes": {
//!         "1": { "dni": "47526381", ... },
//!         "2": { "dni": "46193480", ... }
//!     }
//! }
//! ```
//!
//! Tables are kept in [`BTreeMap`]s so that iterating a table visits its
//! documents in id order, which is also insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::StorageError;

/// The fields of a stored document.
pub type Fields = Map<String, Value>;

/// Identifies a document within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(u64);

impl DocId {
    pub fn new(id: u64) -> Self {
        DocId(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DocId {
    fn from(id: u64) -> Self {
        DocId(id)
    }
}

/// The documents of a single table, ordered by id.
pub(crate) type TableData = BTreeMap<DocId, Fields>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Tables(BTreeMap<String, TableData>);

impl Tables {
    pub fn table(&self, name: &str) -> Option<&TableData> {
        self.0.get(name)
    }

    /// Returns the named table, creating it empty if it is missing.
    pub fn table_mut(&mut self, name: &str) -> &mut TableData {
        self.0.entry(name.to_owned()).or_default()
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Allocates the id for the next document appended to `table`. Fails once
/// the table holds id `u64::MAX`; wrapping around would break id order.
pub(crate) fn next_id(table: &TableData) -> Result<DocId, StorageError> {
    match table.last_key_value() {
        None => Ok(DocId(1)),
        Some((id, _)) => id.0.checked_add(1).map(DocId).ok_or_else(|| {
            StorageError::InvalidFile("document id space exhausted".into())
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_next_id() {
        let mut table = TableData::new();
        assert_eq!(next_id(&table).unwrap(), DocId(1));
        table.insert(DocId(1), Fields::new());
        table.insert(DocId(7), Fields::new());
        assert_eq!(next_id(&table).unwrap(), DocId(8));
        table.remove(&DocId(7));
        assert_eq!(next_id(&table).unwrap(), DocId(2));
    }

    #[test]
    fn test_next_id_exhausted() {
        let mut table = TableData::new();
        table.insert(DocId(u64::MAX - 1), Fields::new());
        assert_eq!(next_id(&table).unwrap(), DocId(u64::MAX));
        table.insert(DocId(u64::MAX), Fields::new());
        assert!(matches!(
            next_id(&table),
            Err(StorageError::InvalidFile(reason)) if reason.contains("exhausted")
        ));
    }

    #[test]
    fn test_ids_are_object_keys() {
        let mut tables = Tables::default();
        let t = tables.table_mut("estudiantes");
        t.insert(DocId(2), fields(json!({"dni": "2"})));
        t.insert(DocId(10), fields(json!({"dni": "10"})));

        let encoded = serde_json::to_value(&tables).unwrap();
        assert_eq!(
            encoded,
            json!({"estudiantes": {"2": {"dni": "2"}, "10": {"dni": "10"}}})
        );

        let decoded: Tables = serde_json::from_value(encoded).unwrap();
        let ids: Vec<_> = decoded.table("estudiantes").unwrap().keys().copied().collect();
        // Numeric, not lexicographic, order.
        assert_eq!(ids, vec![DocId(2), DocId(10)]);
    }

    #[test]
    fn test_table_lifecycle() {
        let mut tables = Tables::default();
        assert!(tables.table("a").is_none());
        tables.table_mut("a");
        tables.table_mut("b");
        assert_eq!(tables.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(tables.remove("a"));
        assert!(!tables.remove("a"));
        tables.clear();
        assert_eq!(tables.names().count(), 0);
    }
}
