//! [`JsonStorage`] owns the database file.
//!
//! The whole database is re-read on every [`JsonStorage::read`] and
//! rewritten on every [`JsonStorage::write`]; nothing is cached between
//! calls. The encoding is human readable: nested values are indented by a
//! configurable number of spaces, keys are followed by `": "`, and non-ASCII
//! text is written as-is.

use std::path::{Path, PathBuf};

use serde::Serialize as _;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::core::{consts, error::StorageError, file_util, tables::Tables};

type Result<T> = std::result::Result<T, StorageError>;

/// A file-backed JSON storage for [`Tables`].
pub(crate) struct JsonStorage {
    path: PathBuf,
    indent: Box<[u8]>,
}

impl JsonStorage {
    /// Opens or creates (if not exists) a database file. Indents wider than
    /// [`consts::MAX_INDENT`] are rejected.
    pub fn open_or_create<P: AsRef<Path>>(
        path: P,
        indent: usize,
        create_dirs: bool,
    ) -> Result<Self> {
        if indent > consts::MAX_INDENT {
            return Err(StorageError::IndentTooWide(indent));
        }
        let path = path.as_ref().to_path_buf();
        file_util::create_if_missing(&path, create_dirs)?;
        Ok(JsonStorage {
            path,
            indent: vec![b' '; indent].into_boxed_slice(),
        })
    }

    /// Reads the database. An empty (or whitespace-only) file is an empty
    /// database.
    pub fn read(&self) -> Result<Tables> {
        let contents = file_util::read_all(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Tables::default());
        }
        let value: Value = serde_json::from_str(&contents)?;
        if !value.is_object() {
            return Err(StorageError::InvalidFile(
                "top-level value must be an object of tables".into(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Replaces the database with `tables`. The file on disk holds either the
    /// previous database or the new one, never a partial write.
    pub fn write(&self, tables: &Tables) -> Result<()> {
        let data = self.encode(tables)?;
        file_util::save_data(&self.path, &data)?;
        Ok(())
    }

    pub fn sync(&self) -> Result<()> {
        std::fs::File::open(&self.path)?.sync_all()?;
        Ok(())
    }

    fn encode(&self, tables: &Tables) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(&self.indent);
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        tables.serialize(&mut ser)?;
        Ok(buf)
    }
}
