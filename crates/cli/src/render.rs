//! Plain-text outline rendering for [`View`]s.
//!
//! ```text
//! project  —  Bulk read  (6/9 shown)  [310/1.2k tokens]
//!   P  —  Projects  (2/2 shown)
//!     P0001 01-14 [★]  Gateway rewrite
//!       [P0001.2] Phase two
//!       [+3 more → P0001]
//! ```

use std::fmt::Write;

use hmem_core::DEFAULT_ROLE;
use hmem_engine::{EntryView, NodeView, Truncation, View, ViewMode, format_tokens};

const INDENT: &str = "  ";

/// Render a view as an indented outline rooted at `name`.
pub fn outline(view: &View, name: &str) -> String {
    let mut out = String::new();
    let header = &view.header;

    if header.total_count == 0 {
        let _ = writeln!(out, "{name}  —  (empty)");
        let _ = writeln!(out, "{INDENT}No memories yet.");
        return out;
    }

    match view.mode {
        ViewMode::Full => {
            let _ = write!(out, "{name}  —  {} entries", header.active_count);
            if header.obsolete_count > 0 {
                let _ = write!(out, "  +{} obsolete", header.obsolete_count);
            }
            let _ = writeln!(
                out,
                "  [{} tokens total]",
                format_tokens(header.total_tokens)
            );
        }
        ViewMode::Budgeted => {
            let _ = writeln!(
                out,
                "{name}  —  Bulk read  ({}/{} shown)  [{}/{} tokens]",
                header.shown_count,
                header.total_count,
                format_tokens(header.shown_tokens),
                format_tokens(header.total_tokens)
            );
        }
    }

    for group in &view.groups {
        let counts = match view.mode {
            ViewMode::Full => format!("({})", group.total),
            ViewMode::Budgeted => format!("({}/{} shown)", group.shown, group.total),
        };
        let _ = writeln!(out, "{INDENT}{}  —  {}  {counts}", group.category, group.label);
        for entry in &group.entries {
            write_entry(&mut out, entry, view.mode, 2);
        }
    }

    if let Some(obsolete) = &view.obsolete {
        let counts = match view.mode {
            ViewMode::Full => format!("({})", obsolete.total),
            ViewMode::Budgeted => format!("({}/{} shown)", obsolete.shown, obsolete.total),
        };
        let _ = writeln!(out, "{INDENT}⚠  Obsolete  {counts}");
        for entry in &obsolete.entries {
            write_entry(&mut out, entry, view.mode, 2);
        }
    }

    out
}

fn write_entry(out: &mut String, entry: &EntryView, mode: ViewMode, level: usize) {
    let pad = INDENT.repeat(level);
    let date = date_part(&entry.created_at);
    let markers = markers(entry);

    match mode {
        ViewMode::Full => {
            let role = if entry.min_role == DEFAULT_ROLE {
                String::new()
            } else {
                format!(" [{}+]", entry.min_role)
            };
            let _ = writeln!(out, "{pad}[{}] {date}{role}{markers}  {}", entry.id, entry.title);
        }
        ViewMode::Budgeted => {
            let short = date.get(5..).unwrap_or(date);
            let _ = writeln!(out, "{pad}{} {short}{markers}  {}", entry.id, entry.title);
        }
    }

    write_children(out, &entry.children, entry.truncated.as_ref(), level + 1);
}

fn write_children(
    out: &mut String,
    children: &[NodeView],
    truncated: Option<&Truncation>,
    level: usize,
) {
    let pad = INDENT.repeat(level);
    for node in children {
        let _ = writeln!(out, "{pad}[{}] {}", node.id, node.title);
        write_children(out, &node.children, node.truncated.as_ref(), level + 1);
    }
    if let Some(t) = truncated {
        let _ = writeln!(out, "{pad}[+{} more → {}]", t.hidden, t.parent_id);
    }
}

fn markers(entry: &EntryView) -> String {
    let mut tags = String::new();
    if entry.flags.favorite {
        tags.push_str(" [♥]");
    }
    if entry.flags.promoted {
        tags.push_str(" [★]");
    }
    if entry.flags.obsolete {
        tags.push_str(" [!]");
    }
    tags
}

/// `YYYY-MM-DD` from a stored timestamp, or the raw text when it is shorter.
fn date_part(created_at: &str) -> &str {
    created_at.get(..10).unwrap_or(created_at)
}
