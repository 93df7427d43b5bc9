use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use tally_core::AppConfig;

/// Write the default configuration to `path` (or the default location)
pub fn run(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path);

    if path.exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());

    Ok(path)
}
