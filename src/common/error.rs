//! Error types for the B+ tree.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the `try_*` operations and by [`validate`].
///
/// Absence and duplicate rejection are ordinary outcomes for the plain
/// operations (`bool` / `Option`); these variants exist for callers that
/// prefer to propagate them with `?`.
///
/// [`validate`]: crate::BPlusTree::validate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Insert refused because the key is already present.
    #[error("key already exists")]
    DuplicateKey,

    /// The key is not present in the tree.
    #[error("key not found")]
    KeyNotFound,

    /// A structural invariant does not hold.
    ///
    /// This indicates a bug in the tree, never a caller mistake.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
