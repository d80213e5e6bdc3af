//! RegionLayer CLI - Command-line interface
//!
//! This binary renders region boundary tiles, pre-warms the base tile store
//! and manages the cache.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::cache::CacheAction;
use commands::prewarm::PrewarmArgs;
use commands::render::RenderArgs;

#[derive(Parser)]
#[command(name = "regionlayer")]
#[command(version)]
#[command(about = "Render political-region boundary tiles with highlights", long_about = None)]
struct Cli {
    /// Boundary file (JSON: version plus region id to [lon, lat] rings)
    #[arg(long, global = true)]
    boundaries: Option<PathBuf>,

    /// Config file (default: ~/.regionlayer/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one tile to a PNG file
    Render {
        /// Zoom level
        #[arg(long)]
        zoom: u8,

        /// Tile column
        #[arg(long)]
        x: u32,

        /// Tile row
        #[arg(long)]
        y: u32,

        /// Region to highlight (repeatable)
        #[arg(long = "highlight")]
        highlight: Vec<String>,

        /// Output PNG path
        #[arg(long)]
        output: PathBuf,
    },

    /// Render and store base tiles for a zoom range
    Prewarm {
        #[arg(long, default_value = "0")]
        min_zoom: u8,

        #[arg(long)]
        max_zoom: u8,

        /// Restrict to min_lon,min_lat,max_lon,max_lat
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<String>,

        /// Concurrent renders (default: [prewarm] concurrency from config)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Manage the base tile store
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            zoom,
            x,
            y,
            highlight,
            output,
        } => commands::render::run(RenderArgs {
            boundaries: cli.boundaries,
            config: cli.config,
            zoom,
            x,
            y,
            highlight,
            output,
        }),
        Commands::Prewarm {
            min_zoom,
            max_zoom,
            bbox,
            concurrency,
        } => commands::prewarm::run(PrewarmArgs {
            boundaries: cli.boundaries,
            config: cli.config,
            min_zoom,
            max_zoom,
            bbox,
            concurrency,
        }),
        Commands::Cache { action } => commands::cache::run(action, cli.config),
        Commands::Init { force } => commands::init::run(cli.config, force),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_with_highlights() {
        let cli = Cli::try_parse_from([
            "regionlayer",
            "--boundaries",
            "regions.json",
            "render",
            "--zoom",
            "4",
            "--x",
            "2",
            "--y",
            "6",
            "--highlight",
            "us-ca",
            "--highlight",
            "us-nv",
            "--output",
            "tile.png",
        ])
        .unwrap();

        assert_eq!(cli.boundaries, Some(PathBuf::from("regions.json")));
        match cli.command {
            Commands::Render { zoom, highlight, .. } => {
                assert_eq!(zoom, 4);
                assert_eq!(highlight, vec!["us-ca", "us-nv"]);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_parse_prewarm_negative_bbox() {
        let cli = Cli::try_parse_from([
            "regionlayer",
            "prewarm",
            "--max-zoom",
            "6",
            "--bbox",
            "-125,32,-114,42",
        ])
        .unwrap();

        match cli.command {
            Commands::Prewarm {
                min_zoom,
                max_zoom,
                bbox,
                ..
            } => {
                assert_eq!((min_zoom, max_zoom), (0, 6));
                assert_eq!(bbox.as_deref(), Some("-125,32,-114,42"));
            }
            _ => panic!("expected prewarm"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["regionlayer", "cache", "stats", "--config", "c.ini"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.ini")));
    }
}
