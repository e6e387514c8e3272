//! Snapshot source trait — where the engine's input comes from.
//!
//! The engine never talks to storage. A source materializes one consistent
//! snapshot, releases whatever handle it used, and hands the snapshot over.

use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// A read-only provider of store snapshots.
///
/// Implementations: JSON snapshot file, in-memory (for tests and embedding).
pub trait SnapshotSource: Send + Sync {
    /// The source name (e.g., "json_file", "in_memory").
    fn name(&self) -> &str;

    /// Materialize a validated snapshot.
    fn snapshot(&self) -> Result<Snapshot, StoreError>;
}
