//! The `core` module contains the "core" data types and functions of the
//! embedded JSON document store.
//!
//! [`storage`] owns the database file and its pretty-printed JSON encoding.
//! [`tables`] is the in-memory image of that file, and [`query`] holds the
//! single-field equality predicate used to select documents.
pub mod consts;
pub(crate) mod error;
mod file_util;
pub(crate) mod query;
pub(crate) mod storage;
pub(crate) mod tables;
