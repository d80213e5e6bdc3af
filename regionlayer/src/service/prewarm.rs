//! Bulk base-tile rendering.
//!
//! Walks a zoom range lazily, one tile at a time, skips tiles no region
//! touches and tiles the base store already holds, and renders the rest with
//! a sliding window of blocking tasks. Nothing proportional to the range is
//! held in memory. Cancellation stops new work, including the walk itself;
//! in-flight renders finish on the blocking pool and are simply not counted.

use super::engine::TileEngine;
use super::error::ServiceError;
use crate::coord::{tile_range, CoordError, GeoBounds, TileKey, TileRange, MAX_ZOOM};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of concurrent renders.
pub const DEFAULT_PREWARM_CONCURRENCY: usize = 8;

/// What to pre-warm.
#[derive(Debug, Clone, PartialEq)]
pub struct PrewarmConfig {
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Area to cover; `None` covers every region
    pub bounds: Option<GeoBounds>,
    /// Renders in flight at once (at least 1)
    pub concurrency: usize,
}

impl PrewarmConfig {
    pub fn new(min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            min_zoom,
            max_zoom,
            bounds: None,
            concurrency: DEFAULT_PREWARM_CONCURRENCY,
        }
    }

    pub fn with_bounds(mut self, bounds: GeoBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Outcome of a pre-warm run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrewarmReport {
    /// Tiles examined
    pub total: usize,
    /// Tiles rendered and stored
    pub rendered: usize,
    /// Tiles already in the base store
    pub existing: usize,
    /// Tiles no region intersects
    pub empty: usize,
    /// Renders that failed
    pub failed: usize,
    /// Tiles abandoned because of cancellation: in flight or never examined
    pub cancelled: usize,
}

impl PrewarmReport {
    pub fn was_cancelled(&self) -> bool {
        self.cancelled > 0
    }
}

/// Render and store every missing base tile described by `config`.
///
/// Errors only for an invalid zoom range; individual render failures are
/// counted in the report.
pub async fn prewarm(
    engine: Arc<TileEngine>,
    config: &PrewarmConfig,
    cancellation: CancellationToken,
) -> Result<PrewarmReport, ServiceError> {
    if config.max_zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(config.max_zoom).into());
    }
    if config.min_zoom > config.max_zoom {
        return Err(CoordError::InvalidZoom(config.min_zoom).into());
    }

    let mut report = PrewarmReport::default();
    let area = match config.bounds.or_else(|| engine.boundaries().bounds()) {
        Some(area) => area,
        None => {
            info!("Prewarm skipped: no regions loaded");
            return Ok(report);
        }
    };

    let ranges = (config.min_zoom..=config.max_zoom)
        .map(|zoom| tile_range(zoom, &area))
        .collect::<Result<Vec<TileRange>, CoordError>>()?;
    let planned = ranges
        .iter()
        .fold(0u64, |sum, range| sum.saturating_add(range.remaining()));
    info!(
        min_zoom = config.min_zoom,
        max_zoom = config.max_zoom,
        planned,
        "Prewarm started"
    );

    let mut tiles = ranges.into_iter().flatten();
    let window = config.concurrency.max(1);
    let mut pending = FuturesUnordered::new();
    let mut exhausted = false;
    let spawn = |key: TileKey| {
        let engine = Arc::clone(&engine);
        async move {
            let result = tokio::task::spawn_blocking(move || engine.base_tile_blocking(&key)).await;
            (key, result)
        }
    };

    loop {
        while !exhausted && pending.len() < window {
            match next_to_render(&engine, &mut tiles, &mut report, &cancellation).await? {
                Some(key) => pending.push(spawn(key)),
                None => exhausted = true,
            }
        }
        if pending.is_empty() {
            break;
        }

        tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                break;
            }

            Some((key, result)) = pending.next() => {
                match result {
                    Ok(Ok(_)) => {
                        report.rendered += 1;
                        debug!(tile = %key, "Prewarmed base tile");
                    }
                    Ok(Err(e)) => {
                        report.failed += 1;
                        warn!(tile = %key, error = %e, "Prewarm render failed");
                    }
                    Err(e) => {
                        report.failed += 1;
                        warn!(tile = %key, error = %e, "Prewarm task failed");
                    }
                }
            }
        }
    }

    let unexamined = planned.saturating_sub(report.total as u64);
    report.cancelled = pending
        .len()
        .saturating_add(usize::try_from(unexamined).unwrap_or(usize::MAX));
    if report.was_cancelled() {
        info!(
            rendered = report.rendered,
            remaining = report.cancelled,
            "Prewarm cancelled"
        );
    } else {
        info!(
            rendered = report.rendered,
            existing = report.existing,
            empty = report.empty,
            failed = report.failed,
            "Prewarm complete"
        );
    }

    Ok(report)
}

/// Tiles examined between yields to the scheduler.
const SCAN_BATCH: usize = 1024;

/// Pull tiles until one needs rendering, counting the ones that do not.
///
/// Returns `None` once the tiles run out or the token is cancelled. Long
/// stretches of empty or stored tiles yield every [`SCAN_BATCH`] tiles so
/// cancellation is seen promptly.
async fn next_to_render<I>(
    engine: &TileEngine,
    tiles: &mut I,
    report: &mut PrewarmReport,
    cancellation: &CancellationToken,
) -> Result<Option<TileKey>, ServiceError>
where
    I: Iterator<Item = TileKey>,
{
    let mut scanned = 0usize;
    loop {
        if cancellation.is_cancelled() {
            return Ok(None);
        }
        let Some(key) = tiles.next() else {
            return Ok(None);
        };
        report.total += 1;

        let bounds = key.bounds()?;
        if engine.boundaries().intersecting(&bounds).next().is_none() {
            report.empty += 1;
        } else if engine.base_store().contains(&key) {
            report.existing += 1;
        } else {
            return Ok(Some(key));
        }

        scanned += 1;
        if scanned % SCAN_BATCH == 0 {
            tokio::task::yield_now().await;
        }
    }
}
