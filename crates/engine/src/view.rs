//! View assembly — the engine's output.
//!
//! Two modes over the same snapshot:
//!
//! - **Full**: every record and node is visible. Only the cross-category
//!   top-`full_view_promoted` records by score are marked promoted.
//! - **Budgeted**: records go through [`select`](crate::select::select) and
//!   every subtree through the budget [`CapPolicy`].
//!
//! Annotations live on the produced [`EntryView`]s; the snapshot is never
//! touched, so switching modes is just assembling again.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use hmem_config::HmemConfig;
use hmem_core::model::Record;
use hmem_core::snapshot::Snapshot;
use serde::Serialize;
use tracing::debug;

use crate::cap::CapPolicy;
use crate::rank;
use crate::select::select;
use crate::token::TokenCounter;

// ── Types ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Full,
    Budgeted,
}

/// A complete, presentation-agnostic view of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub mode: ViewMode,
    pub header: ViewHeader,
    /// Active records grouped by category, sorted by category letter
    pub groups: Vec<CategoryGroup>,
    /// Obsolete records shown in this view, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obsolete: Option<ObsoleteGroup>,
}

/// Summary counters shown above a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewHeader {
    /// Root records shown (active + obsolete)
    pub shown_count: usize,
    /// Root records in the snapshot (active + obsolete)
    pub total_count: usize,
    pub shown_tokens: usize,
    pub total_tokens: usize,
    pub active_count: usize,
    pub obsolete_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: char,
    pub label: String,
    /// Entries listed in this group
    pub shown: usize,
    /// Active records in this category
    pub total: usize,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObsoleteGroup {
    pub shown: usize,
    pub total: usize,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryFlags {
    pub promoted: bool,
    pub favorite: bool,
    pub obsolete: bool,
}

/// One root record with its (possibly pruned) subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub id: String,
    pub category: char,
    pub seq: u32,
    pub title: String,
    pub created_at: String,
    pub min_role: String,
    pub flags: EntryFlags,
    pub children: Vec<NodeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<Truncation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub depth: u32,
    pub seq: u32,
    pub title: String,
    pub children: Vec<NodeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<Truncation>,
}

/// Marker for a parent whose children were cut. `parent_id` is what a
/// consumer asks for to read the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    pub parent_id: String,
    pub hidden: usize,
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// Builds [`View`]s from snapshots with one configuration and one clock.
pub struct ViewAssembler<'a> {
    config: &'a HmemConfig,
    now: DateTime<Utc>,
    tokens: TokenCounter,
}

impl<'a> ViewAssembler<'a> {
    pub fn new(config: &'a HmemConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            now,
            tokens: TokenCounter::new(config.tokens.chars_per_token),
        }
    }

    pub fn assemble(&self, snapshot: &Snapshot, mode: ViewMode) -> View {
        let view = match mode {
            ViewMode::Full => self.full(snapshot),
            ViewMode::Budgeted => self.budgeted(snapshot),
        };
        debug!(
            mode = ?mode,
            shown = view.header.shown_count,
            total = view.header.total_count,
            shown_tokens = view.header.shown_tokens,
            total_tokens = view.header.total_tokens,
            "View assembled"
        );
        view
    }

    fn full(&self, snapshot: &Snapshot) -> View {
        let policy = CapPolicy::Unbounded;
        let promoted: BTreeSet<&str> = rank::most_accessed(snapshot.active_records(), self.now)
            .into_iter()
            .take(self.config.bulk_read.full_view_promoted)
            .map(|scored| scored.item.id.as_str())
            .collect();

        let mut groups: BTreeMap<char, Vec<&Record>> = BTreeMap::new();
        for record in snapshot.active_records() {
            groups.entry(record.category).or_default().push(record);
        }
        let groups = groups
            .into_iter()
            .map(|(category, records)| CategoryGroup {
                category,
                label: self.config.label_for(category),
                shown: records.len(),
                total: records.len(),
                entries: records
                    .into_iter()
                    .map(|r| self.entry(snapshot, r, promoted.contains(r.id.as_str()), &policy))
                    .collect(),
            })
            .collect();

        let obsolete: Vec<EntryView> = snapshot
            .obsolete_records()
            .map(|r| self.entry(snapshot, r, false, &policy))
            .collect();

        let header = self.header(snapshot, snapshot.records(), &policy);
        View {
            mode: ViewMode::Full,
            header,
            groups,
            obsolete: obsolete_group(obsolete, header.obsolete_count),
        }
    }

    fn budgeted(&self, snapshot: &Snapshot) -> View {
        let limits = &self.config.bulk_read;
        let policy = CapPolicy::Budget { limits, now: self.now };
        let selection = select(snapshot.records(), limits, self.now);

        let mut totals: BTreeMap<char, usize> = BTreeMap::new();
        let mut groups: BTreeMap<char, Vec<&Record>> = BTreeMap::new();
        for record in snapshot.active_records() {
            *totals.entry(record.category).or_default() += 1;
            if selection.is_visible(&record.id) {
                groups.entry(record.category).or_default().push(record);
            }
        }
        let groups = groups
            .into_iter()
            .map(|(category, records)| CategoryGroup {
                category,
                label: self.config.label_for(category),
                shown: records.len(),
                total: totals.get(&category).copied().unwrap_or_default(),
                entries: records
                    .into_iter()
                    .map(|r| self.entry(snapshot, r, selection.is_promoted(&r.id), &policy))
                    .collect(),
            })
            .collect();

        let visible_obsolete: Vec<&Record> = selection
            .visible_obsolete
            .iter()
            .filter_map(|id| snapshot.record(id))
            .collect();
        let obsolete: Vec<EntryView> = visible_obsolete
            .iter()
            .map(|r| self.entry(snapshot, r, false, &policy))
            .collect();

        let shown_roots = snapshot
            .active_records()
            .filter(|r| selection.is_visible(&r.id))
            .chain(visible_obsolete.iter().copied());
        let header = self.header(snapshot, shown_roots, &policy);

        View {
            mode: ViewMode::Budgeted,
            header,
            groups,
            obsolete: obsolete_group(obsolete, header.obsolete_count),
        }
    }

    fn header<'r>(
        &self,
        snapshot: &Snapshot,
        shown_roots: impl IntoIterator<Item = &'r Record>,
        policy: &CapPolicy<'_>,
    ) -> ViewHeader {
        let shown_roots: Vec<&Record> = shown_roots.into_iter().collect();
        let active_count = snapshot.active_records().count();
        let obsolete_count = snapshot.obsolete_records().count();
        ViewHeader {
            shown_count: shown_roots.len(),
            total_count: active_count + obsolete_count,
            shown_tokens: self.tokens.shown(snapshot, shown_roots, policy),
            total_tokens: self.tokens.total(snapshot),
            active_count,
            obsolete_count,
        }
    }

    fn entry(
        &self,
        snapshot: &Snapshot,
        record: &Record,
        promoted: bool,
        policy: &CapPolicy<'_>,
    ) -> EntryView {
        let (children, truncated) = self.subtree(snapshot, &record.id, policy);
        EntryView {
            id: record.id.clone(),
            category: record.category,
            seq: record.seq,
            title: record.display_title(),
            created_at: record.created_at.clone(),
            min_role: record.min_role.clone(),
            flags: EntryFlags {
                promoted,
                favorite: record.favorite,
                obsolete: record.obsolete,
            },
            children,
            truncated,
        }
    }

    fn subtree(
        &self,
        snapshot: &Snapshot,
        parent_id: &str,
        policy: &CapPolicy<'_>,
    ) -> (Vec<NodeView>, Option<Truncation>) {
        let capped = policy.apply(snapshot.children_of(parent_id));
        let truncated = (capped.hidden > 0).then(|| Truncation {
            parent_id: parent_id.to_string(),
            hidden: capped.hidden,
        });

        let nodes = capped
            .visible
            .into_iter()
            .map(|node| {
                let (children, truncated) = self.subtree(snapshot, &node.id, policy);
                NodeView {
                    id: node.id.clone(),
                    depth: node.depth,
                    seq: node.seq,
                    title: node.display_title(),
                    children,
                    truncated,
                }
            })
            .collect();

        (nodes, truncated)
    }
}

fn obsolete_group(entries: Vec<EntryView>, total: usize) -> Option<ObsoleteGroup> {
    if entries.is_empty() {
        return None;
    }
    Some(ObsoleteGroup {
        shown: entries.len(),
        total,
        entries,
    })
}

impl View {
    /// Every entry in display order: category groups first, then obsolete.
    pub fn entries(&self) -> impl Iterator<Item = &EntryView> {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .chain(self.obsolete.iter().flat_map(|o| o.entries.iter()))
    }

    pub fn is_empty(&self) -> bool {
        self.header.total_count == 0
    }
}
