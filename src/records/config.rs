use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::Document;
use crate::core::consts;
use crate::records::error::RecordError;

/// The table students are stored in.
pub const RECORDS_TABLE: &str = "estudiantes";

/// Which stored record a lookup returns when several share an identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The earliest inserted record.
    #[default]
    First,
    /// The most recently inserted record.
    Last,
    /// Fail with [`RecordError::AmbiguousIdentifier`].
    Unique,
}

impl MatchPolicy {
    /// Picks one document out of the lookup results, which must be in
    /// insertion order.
    pub(crate) fn select(
        self,
        id: &str,
        mut matches: Vec<Document>,
    ) -> Result<Option<Document>, RecordError> {
        match self {
            _ if matches.is_empty() => Ok(None),
            MatchPolicy::First => Ok(Some(matches.swap_remove(0))),
            MatchPolicy::Last => Ok(matches.pop()),
            MatchPolicy::Unique if matches.len() > 1 => Err(RecordError::AmbiguousIdentifier {
                id: id.to_owned(),
                matches: matches.len(),
            }),
            MatchPolicy::Unique => Ok(matches.pop()),
        }
    }
}

/// Whether inserting a student whose identifier is already stored is
/// allowed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Store a second record under the same identifier.
    #[default]
    Allow,
    /// Fail with [`RecordError::DuplicateIdentifier`].
    Reject,
}

/// Where and how a [`crate::RecordStore`] persists its records.
///
/// Can be deserialized from a host application's configuration; only
/// `path` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub match_policy: MatchPolicy,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    #[serde(default)]
    pub create_dirs: bool,
}

fn default_table() -> String {
    RECORDS_TABLE.to_owned()
}

fn default_indent() -> usize {
    consts::DEFAULT_INDENT
}

impl StoreConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        StoreConfig {
            path: path.as_ref().to_path_buf(),
            table: default_table(),
            indent: default_indent(),
            match_policy: MatchPolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
            create_dirs: false,
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Spaces per nesting level in the database file. Values above
    /// [`consts::MAX_INDENT`] make every operation fail with
    /// [`crate::StorageError::IndentTooWide`].
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}
