//! Error types for the hmem domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] aggregates them.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all hmem operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Snapshot sources ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A snapshot whose structure cannot be trusted.
///
/// These are the only fatal conditions in the engine: an empty snapshot is
/// valid, a corrupt one is not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Duplicate id in snapshot: {0}")]
    DuplicateId(String),

    #[error("Node {node} references missing parent {parent}")]
    MissingParent { node: String, parent: String },

    #[error("Node {node} is listed under parent {listed} but names parent {declared}")]
    ParentKeyMismatch {
        node: String,
        listed: String,
        declared: String,
    },

    #[error("Node {node} has root {declared}, expected {expected}")]
    RootMismatch {
        node: String,
        declared: String,
        expected: String,
    },

    #[error("Node {node} has depth {declared}, expected {expected}")]
    DepthMismatch {
        node: String,
        declared: u32,
        expected: u32,
    },

    #[error("Record {record} has invalid category {category:?}")]
    InvalidCategory { record: String, category: char },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read snapshot at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse snapshot at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error(transparent)]
    Integrity(#[from] SnapshotError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parent_displays_both_ids() {
        let err = Error::from(StoreError::from(SnapshotError::MissingParent {
            node: "P0001.3".into(),
            parent: "P0009".into(),
        }));
        let msg = err.to_string();
        assert!(msg.contains("P0001.3"));
        assert!(msg.contains("P0009"));
        assert!(msg.starts_with("Store error"));
    }

    #[test]
    fn json_errors_convert() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn integrity_error_passes_through_store_error() {
        let err = StoreError::from(SnapshotError::DuplicateId("L0002".into()));
        assert_eq!(err.to_string(), "Duplicate id in snapshot: L0002");
    }
}
