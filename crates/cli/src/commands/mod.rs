pub mod config_cmd;
pub mod stats;
pub mod view;

use std::path::Path;

use hmem_config::{ConfigError, HmemConfig};
use hmem_core::snapshot::Snapshot;
use hmem_core::store::SnapshotSource;
use hmem_store::JsonFileSource;

/// Resolve the effective config for a snapshot: an explicit file wins over
/// discovery, and environment overrides apply either way.
pub(crate) fn load_config(
    snapshot: &Path,
    explicit: Option<&Path>,
) -> Result<HmemConfig, ConfigError> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    reason: "file not found".into(),
                });
            }
            let mut config = HmemConfig::load_from(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            Ok(config)
        }
        None => HmemConfig::discover(snapshot),
    }
}

pub(crate) fn load_snapshot(path: &Path) -> hmem_core::Result<Snapshot> {
    let source = JsonFileSource::new(path);
    let snapshot = source.snapshot()?;
    tracing::debug!(
        source = source.name(),
        records = snapshot.records().len(),
        nodes = snapshot.node_count(),
        "Snapshot ready"
    );
    Ok(snapshot)
}

/// Display name for a snapshot file, used as the outline's root label.
pub(crate) fn snapshot_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "memory".to_string())
}
