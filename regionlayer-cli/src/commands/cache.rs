//! Cache management CLI commands.

use clap::Subcommand;
use regionlayer::cache::{BaseTileStore, CacheStatistics};
use std::path::PathBuf;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Delete every stored base tile
    Clear,
    /// Show base tile store statistics
    Stats,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config: Option<PathBuf>) -> Result<(), CliError> {
    let runner = CliRunner::new(config.as_deref())?;
    runner.log_startup("cache");

    let store = runner.open_store()?;
    println!("Base tile store: {}", store.root().display());

    match action {
        CacheAction::Clear => {
            let entries = store.entry_count();
            store.clear_all()?;
            println!("Deleted {} base tiles", entries);
            println!("The data version marker was kept; tiles are rebuilt on demand.");
            Ok(())
        }
        CacheAction::Stats => {
            let version = store.data_version().unwrap_or_else(|| "<none>".to_string());
            let statistics = CacheStatistics::from_stats(&store.stats());
            println!("{}", statistics.format(&version));
            Ok(())
        }
    }
}
