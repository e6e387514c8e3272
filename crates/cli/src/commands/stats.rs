//! `hmem stats` — Summarize what a snapshot holds.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use hmem_engine::{TokenCounter, ViewAssembler, ViewMode, format_tokens};

pub fn run(
    snapshot_path: &Path,
    config_path: Option<&Path>,
) -> hmem_core::Result<()> {
    let config = super::load_config(snapshot_path, config_path)?;
    let snapshot = super::load_snapshot(snapshot_path)?;

    let counter = TokenCounter::new(config.tokens.chars_per_token);
    let budgeted = ViewAssembler::new(&config, Utc::now()).assemble(&snapshot, ViewMode::Budgeted);

    let mut per_category: BTreeMap<char, (usize, usize)> = BTreeMap::new();
    for record in snapshot.records() {
        let slot = per_category.entry(record.category).or_default();
        if record.obsolete {
            slot.1 += 1;
        } else {
            slot.0 += 1;
        }
    }

    println!("📊 hmem Snapshot Stats");
    println!("=====================");
    println!("  Snapshot:     {}", snapshot_path.display());
    println!("  Records:      {}", snapshot.records().len());
    println!("  Active:       {}", budgeted.header.active_count);
    println!("  Obsolete:     {}", budgeted.header.obsolete_count);
    println!("  Nodes:        {}", snapshot.node_count());
    println!("  Tokens:       {}", format_tokens(counter.total(&snapshot)));
    println!(
        "  Bulk read:    {}/{} records, {}/{} tokens",
        budgeted.header.shown_count,
        budgeted.header.total_count,
        format_tokens(budgeted.header.shown_tokens),
        format_tokens(budgeted.header.total_tokens)
    );

    if !per_category.is_empty() {
        println!();
        println!("  Categories");
        println!("  ────────────────────────────────────");
        for (category, (active, obsolete)) in &per_category {
            let label = config.label_for(*category);
            if *obsolete > 0 {
                println!("  {category}  {label:<18} {active:>4}  (+{obsolete} obsolete)");
            } else {
                println!("  {category}  {label:<18} {active:>4}");
            }
        }
    }

    Ok(())
}
