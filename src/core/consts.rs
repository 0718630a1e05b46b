//! Defaults for the on-disk JSON encoding.

/// Number of spaces used to indent each nesting level of the database file.
pub const DEFAULT_INDENT: usize = 4;

/// The table used by [`crate::DB::default_table`] unless the builder
/// overrides it.
pub const DEFAULT_TABLE: &str = "_default";

/// Widest indent accepted by the builders.
pub const MAX_INDENT: usize = 16;

const _: () = {
    assert!(DEFAULT_INDENT <= MAX_INDENT, "default indent fits the bound");
    assert!(!DEFAULT_TABLE.is_empty(), "default table has a name");
};
