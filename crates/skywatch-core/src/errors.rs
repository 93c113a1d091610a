//! Store error taxonomy.
//!
//! Validation failures with no payload are plain boolean returns at the
//! call site; these variants cover the operations where the caller needs
//! to know why.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// An entity with this id already exists.
    #[error("entity id collision: {0}")]
    DuplicateEntity(String),

    /// A group with this id already exists.
    #[error("group id collision: {0}")]
    DuplicateGroup(String),

    /// No group with this id.
    #[error("unknown group: {0}")]
    UnknownGroup(String),

    /// A snapshot could not be restored; live state is untouched.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
