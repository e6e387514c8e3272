//! # hmem Core
//!
//! Domain types, traits, and error definitions for the hmem view engine.
//! This crate has **no engine logic** — it defines the memory model that the
//! config, engine, store and CLI crates are written against.
//!
//! ## Design Philosophy
//!
//! The store's contents are represented as an immutable [`Snapshot`]: an arena
//! of records and nodes indexed by id, with an explicit parent → children
//! adjacency map. Everything downstream reads a snapshot and produces derived,
//! non-persistent values; nothing mutates it.

pub mod error;
pub mod model;
pub mod snapshot;
pub mod store;
pub mod time;
pub mod title;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result, SnapshotError, StoreError};
pub use model::{Node, Record, Scorable, DEFAULT_ROLE};
pub use snapshot::{Snapshot, SnapshotData};
pub use store::SnapshotSource;
pub use time::parse_timestamp;
pub use title::auto_title;
