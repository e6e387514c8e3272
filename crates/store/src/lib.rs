//! Snapshot sources for hmem.
//!
//! Neither source writes anything: they read what a store exported and hand
//! the engine a validated [`Snapshot`](hmem_core::Snapshot).

pub mod file_source;
pub mod in_memory;

pub use file_source::JsonFileSource;
pub use in_memory::InMemorySource;
