//! Render command - render a single tile to a PNG file.

use regionlayer::service::TileLayer;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the render command.
pub struct RenderArgs {
    pub boundaries: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
    pub highlight: Vec<String>,
    pub output: PathBuf,
}

/// Run the render command.
pub fn run(args: RenderArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("render");

    let engine = runner.create_engine(args.boundaries.as_ref())?;
    for id in &args.highlight {
        if !engine.boundaries().contains(id) {
            warn!(region = %id, "Highlighted region not in boundary file");
            println!("Warning: region '{}' is not in the boundary file", id);
        }
    }

    println!("Rendering tile {}/{}/{}", args.zoom, args.x, args.y);
    if !args.highlight.is_empty() {
        println!("  Highlighted: {}", args.highlight.join(", "));
    }

    let runtime = runner.runtime()?;
    let start = std::time::Instant::now();
    let tile = runtime.block_on(async {
        let layer = TileLayer::new(engine, runtime.handle().clone());
        layer.update_highlighted_regions(args.highlight.iter().cloned());
        layer.request_tile(args.zoom, args.x, args.y).wait().await
    });

    let tile = tile.ok_or_else(|| {
        CliError::Render(format!(
            "tile {}/{}/{} produced no image (see log for details)",
            args.zoom, args.x, args.y
        ))
    })?;
    let png = tile.encode_png()?;

    std::fs::write(&args.output, &png).map_err(|e| CliError::FileWrite {
        path: args.output.display().to_string(),
        error: e,
    })?;

    let elapsed = start.elapsed();
    info!(
        path = %args.output.display(),
        bytes = png.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Tile saved"
    );
    println!(
        "Saved {} ({} bytes) in {:.2}s",
        args.output.display(),
        png.len(),
        elapsed.as_secs_f64()
    );

    Ok(())
}
