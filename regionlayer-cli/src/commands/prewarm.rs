//! Prewarm command - render base tiles for a zoom range ahead of time.

use regionlayer::coord::MAX_ZOOM;
use regionlayer::service::prewarm;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use super::common::parse_bbox;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the prewarm command.
pub struct PrewarmArgs {
    pub boundaries: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub bbox: Option<String>,
    pub concurrency: Option<usize>,
}

/// Run the prewarm command.
pub fn run(args: PrewarmArgs) -> Result<(), CliError> {
    if args.min_zoom > args.max_zoom || args.max_zoom > MAX_ZOOM {
        return Err(CliError::InvalidArgument(format!(
            "zoom range {}..={} must be ascending and at most {}",
            args.min_zoom, args.max_zoom, MAX_ZOOM
        )));
    }

    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("prewarm");

    let mut config = runner
        .config()
        .prewarm_config(args.min_zoom, args.max_zoom);
    if let Some(bbox) = args.bbox.as_deref() {
        config = config.with_bounds(parse_bbox(bbox).map_err(CliError::InvalidArgument)?);
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }

    let engine = runner.create_engine(args.boundaries.as_ref())?;
    println!(
        "Prewarming zoom {}..={} with {} concurrent renders",
        config.min_zoom, config.max_zoom, config.concurrency
    );

    let runtime = runner.runtime()?;
    let start = std::time::Instant::now();
    let report = runtime
        .block_on(prewarm(engine, &config, CancellationToken::new()))
        .map_err(CliError::Prewarm)?;

    println!();
    println!("Prewarm complete in {:.1}s", start.elapsed().as_secs_f64());
    println!("  Tiles considered: {}", report.total);
    println!("  Rendered:         {}", report.rendered);
    println!("  Already stored:   {}", report.existing);
    println!("  Empty (skipped):  {}", report.empty);
    if report.failed > 0 {
        println!("  Failed:           {}", report.failed);
    }

    Ok(())
}
