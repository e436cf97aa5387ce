//! Core Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A core error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every one of these is a caller contract violation: the same input will
/// always fail the same way.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A collection was queried with a key type it can't interpret.
    #[display("don't know how to fetch objects by {_0}")]
    InvalidArgument(#[error(not(source))] &'static str),
    /// The string can't be turned into an identifier.
    #[display("invalid identifier: {_0}")]
    InvalidIdentifier(#[error(not(source))] String),
    /// A glob or regular expression failed to compile.
    #[display("invalid pattern: {_0}")]
    InvalidPattern(#[error(not(source))] String),
    /// Two snapshots with the same name were added to one representation.
    #[display("attempted to create a snapshot with a duplicate name '{name}' for {rep}")]
    DuplicateSnapshotName {
        /// Display form of the owning representation.
        rep: String,
        /// The offending snapshot name.
        name: String,
    },
    /// A strict freeze found two objects sharing one identifier.
    #[display("duplicate identifier: {_0}")]
    DuplicateIdentifier(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidArgument("i32").to_string(), "don't know how to fetch objects by i32");
        assert_eq!(
            ErrorKind::DuplicateSnapshotName {
                rep: "<rep item=/a.md name=default>".to_string(),
                name: "last".to_string(),
            }
            .to_string(),
            "attempted to create a snapshot with a duplicate name 'last' for <rep item=/a.md name=default>"
        );
    }
}
