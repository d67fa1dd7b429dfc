//! Error types for checked trie lookups.
//!
//! Core trie operations are total and never fail; these errors only surface
//! through [`Trie::try_get`](crate::Trie::try_get), which tells a missing key
//! apart from a value of another type.

/// Result type for checked trie lookups.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in a checked lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No value is stored at the key.
    #[error("Key not found")]
    KeyNotFound,

    /// A value is stored at the key, but with a different type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type requested by the caller.
        expected: &'static str,
        /// The type of the stored value.
        found: &'static str,
    },
}
