//! Bounded-disclosure view engine for hmem.
//!
//! Given one [`Snapshot`](hmem_core::Snapshot) of an agent's memory store,
//! decides which records and nodes a consumer gets to see:
//!
//! 1. [`score`] — time-decayed access score for any record or node
//! 2. [`select`] — per-category newest / most-accessed / favorite selection
//! 3. [`cap`] — per-parent pruning of child nodes, applied recursively
//! 4. [`token`] — total vs. shown token accounting
//! 5. [`view`] — grouped, annotated output for an external renderer
//!
//! Everything is synchronous and request-scoped. The only clock is the `now`
//! passed in by the caller.

pub mod cap;
pub mod rank;
pub mod score;
pub mod select;
pub mod token;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cap::{CapPolicy, Capped};
pub use score::{ScoredItem, score, score_at};
pub use select::{Selection, select};
pub use token::{TokenCounter, estimate_tokens, format_tokens};
pub use view::{
    CategoryGroup, EntryFlags, EntryView, NodeView, ObsoleteGroup, Truncation, View,
    ViewAssembler, ViewHeader, ViewMode,
};
