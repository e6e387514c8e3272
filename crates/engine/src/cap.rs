//! Per-parent capping of child nodes.
//!
//! A parent with at most `top_newest` children shows all of them. Otherwise
//! the visible children are the `top_newest` newest plus the `top_accessed`
//! highest-scoring accessed ones, and the rest are counted as hidden. Callers
//! recurse into each visible child with the same policy; budgets are local to
//! each parent.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use hmem_config::BulkReadConfig;
use hmem_core::model::Node;

use crate::rank;

/// Visible children of one parent, in stored order, plus how many were cut.
#[derive(Debug, Clone)]
pub struct Capped<'a> {
    pub visible: Vec<&'a Node>,
    pub hidden: usize,
}

/// How child lists are pruned for one view request.
#[derive(Debug, Clone, Copy)]
pub enum CapPolicy<'a> {
    /// Full view: every child is visible.
    Unbounded,
    /// Budgeted view: newest + most-accessed per parent.
    Budget {
        limits: &'a BulkReadConfig,
        now: DateTime<Utc>,
    },
}

impl CapPolicy<'_> {
    pub fn apply<'n>(&self, children: &'n [Node]) -> Capped<'n> {
        match *self {
            CapPolicy::Unbounded => Capped {
                visible: children.iter().collect(),
                hidden: 0,
            },
            CapPolicy::Budget { limits, now } => cap(children, limits, now),
        }
    }
}

/// Cap one parent's direct children.
pub fn cap<'n>(children: &'n [Node], limits: &BulkReadConfig, now: DateTime<Utc>) -> Capped<'n> {
    if children.len() <= limits.top_newest {
        return Capped {
            visible: children.iter().collect(),
            hidden: 0,
        };
    }

    let mut keep: HashSet<&str> = rank::newest_first(children)
        .into_iter()
        .take(limits.top_newest)
        .map(|n| n.id.as_str())
        .collect();
    keep.extend(
        rank::most_accessed(children, now)
            .into_iter()
            .take(limits.top_accessed)
            .map(|scored| scored.item.id.as_str()),
    );

    let visible: Vec<&Node> = children
        .iter()
        .filter(|n| keep.contains(n.id.as_str()))
        .collect();
    let hidden = children.len() - visible.len();

    Capped { visible, hidden }
}
