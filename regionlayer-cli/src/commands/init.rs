//! Init command - write a commented default config.ini.

use regionlayer::config::{config_file_path, ConfigFile};
use std::path::PathBuf;

use crate::error::CliError;

/// Write the default configuration unless the file exists (or `force`).
pub fn run(path: Option<PathBuf>, force: bool) -> Result<(), CliError> {
    let path = path.unwrap_or_else(config_file_path);

    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
