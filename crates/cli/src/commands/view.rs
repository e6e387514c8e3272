//! `hmem view` — Print what a consumer sees when reading a snapshot.

use std::path::Path;

use chrono::Utc;
use hmem_engine::{ViewAssembler, ViewMode};

use crate::render;

pub fn run(
    snapshot_path: &Path,
    config_path: Option<&Path>,
    full: bool,
    json: bool,
) -> hmem_core::Result<()> {
    let config = super::load_config(snapshot_path, config_path)?;
    let snapshot = super::load_snapshot(snapshot_path)?;

    let mode = if full { ViewMode::Full } else { ViewMode::Budgeted };
    let view = ViewAssembler::new(&config, Utc::now()).assemble(&snapshot, mode);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::outline(&view, &super::snapshot_name(snapshot_path)));
    }

    Ok(())
}
