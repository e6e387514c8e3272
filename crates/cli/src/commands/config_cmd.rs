//! `hmem config` — Configuration inspection commands.

use std::path::{Path, PathBuf};

use hmem_config::{CONFIG_FILE_NAMES, HmemConfig};
use hmem_core::Error;

pub fn show(snapshot: Option<&Path>) -> hmem_core::Result<()> {
    let config = HmemConfig::discover(&anchor(snapshot))?;
    let toml_str = toml::to_string_pretty(&config).map_err(|e| Error::Config {
        message: e.to_string(),
    })?;
    println!("{toml_str}");
    Ok(())
}

pub fn path(snapshot: Option<&Path>) -> hmem_core::Result<()> {
    match HmemConfig::discover_path(&anchor(snapshot)) {
        Some(found) => println!("{}", found.display()),
        None => {
            let fallback = HmemConfig::config_dir().join(CONFIG_FILE_NAMES[1]);
            println!("{}", fallback.display());
            eprintln!("⚠️  No config file found, defaults are in effect");
        }
    }
    Ok(())
}

/// Discovery looks next to the snapshot; without one, the current directory.
fn anchor(snapshot: Option<&Path>) -> PathBuf {
    snapshot
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("./snapshot.json"))
}
