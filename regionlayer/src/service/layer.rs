//! Per-consumer tile layer.
//!
//! A `TileLayer` is what a map viewport talks to. Each request gets its own
//! oneshot channel and a child of the layer's cancellation token; the result
//! is sent only after the liveness table confirms the request is still
//! wanted.

use super::active::{ActiveRequests, RequestState};
use super::engine::{InvalidationReport, TileEngine};
use crate::coord::TileKey;
use crate::raster::TileImage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct LayerCounters {
    requested: AtomicU64,
    delivered: AtomicU64,
    cancelled: AtomicU64,
    failed: AtomicU64,
}

/// Snapshot of a layer's request counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    pub requested: u64,
    pub delivered: u64,
    pub cancelled: u64,
    pub failed: u64,
}

impl LayerStats {
    /// Requests that reached a final state.
    pub fn settled(&self) -> u64 {
        self.delivered + self.cancelled + self.failed
    }
}

/// Pending result of [`TileLayer::request_tile`].
#[derive(Debug)]
pub struct TileResponse {
    key: TileKey,
    token: CancellationToken,
    rx: oneshot::Receiver<TileImage>,
}

impl TileResponse {
    pub fn key(&self) -> TileKey {
        self.key
    }

    /// Stop waiting for this tile. The render may still finish.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the tile.
    ///
    /// `None` means nothing to draw: the request was cancelled, superseded,
    /// detached, or failed. Issuing the same request again is always safe.
    pub async fn wait(self) -> Option<TileImage> {
        tokio::select! {
            biased;

            _ = self.token.cancelled() => None,
            result = self.rx => result.ok(),
        }
    }
}

/// One consumer of the tile engine.
///
/// Dropping the layer detaches it.
pub struct TileLayer {
    engine: Arc<TileEngine>,
    active: Arc<ActiveRequests>,
    cancellation: CancellationToken,
    next_id: AtomicU64,
    runtime: Handle,
    counters: Arc<LayerCounters>,
}

impl TileLayer {
    /// Create a layer that spawns resolution work on `runtime`.
    pub fn new(engine: Arc<TileEngine>, runtime: Handle) -> Self {
        Self {
            engine,
            active: Arc::new(ActiveRequests::new()),
            cancellation: CancellationToken::new(),
            next_id: AtomicU64::new(1),
            runtime,
            counters: Arc::new(LayerCounters::default()),
        }
    }

    pub fn engine(&self) -> &Arc<TileEngine> {
        &self.engine
    }

    /// Request tile `zoom/x/y`.
    ///
    /// Returns immediately; the image is produced asynchronously. An older
    /// outstanding request for the same tile is superseded.
    pub fn request_tile(&self, zoom: u8, x: u32, y: u32) -> TileResponse {
        let key = TileKey::new(zoom, x, y);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = self.cancellation.child_token();
        let (tx, rx) = oneshot::channel();
        self.counters.requested.fetch_add(1, Ordering::Relaxed);

        let response = TileResponse {
            key,
            token: token.clone(),
            rx,
        };

        if token.is_cancelled() || !self.active.register(key, id, token.clone()) {
            debug!(tile = %key, "Tile requested on detached layer");
            token.cancel();
            self.counters.cancelled.fetch_add(1, Ordering::Relaxed);
            return response;
        }

        let engine = Arc::clone(&self.engine);
        let active = Arc::clone(&self.active);
        let counters = Arc::clone(&self.counters);

        self.runtime.spawn(async move {
            if token.is_cancelled() {
                active.cancel(&key, id);
                counters.cancelled.fetch_add(1, Ordering::Relaxed);
                return;
            }
            active.set_state(&key, id, RequestState::Resolving);

            match engine.resolve(key).await {
                Ok(image) => {
                    let state = active.complete(&key, id);
                    if state == RequestState::Delivered && tx.send(image).is_ok() {
                        counters.delivered.fetch_add(1, Ordering::Relaxed);
                    } else {
                        debug!(tile = %key, request = id, %state, "Dropping stale tile result");
                        counters.cancelled.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(e) => {
                    active.complete(&key, id);
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(tile = %key, error = %e, "Tile request failed");
                }
            }
        });

        response
    }

    /// Replace the highlighted set. See [`TileEngine::update_highlighted_regions`].
    pub fn update_highlighted_regions<I, S>(&self, ids: I) -> InvalidationReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engine.update_highlighted_regions(ids)
    }

    /// Cancel every outstanding request.
    ///
    /// No result is delivered after this returns, and later requests resolve
    /// to `None` immediately. Returns the number of requests cancelled.
    pub fn detach(&self) -> usize {
        if self.cancellation.is_cancelled() && self.active.is_detached() {
            return 0;
        }
        self.cancellation.cancel();
        let cancelled = self.active.detach();
        info!(cancelled, "Tile layer detached");
        cancelled
    }

    pub fn is_detached(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Number of requests still awaiting resolution.
    pub fn pending_requests(&self) -> usize {
        self.active.len()
    }

    /// State of the live request for a tile, if any.
    pub fn request_state(&self, key: &TileKey) -> Option<RequestState> {
        self.active.state(key)
    }

    pub fn stats(&self) -> LayerStats {
        LayerStats {
            requested: self.counters.requested.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

impl Drop for TileLayer {
    fn drop(&mut self) {
        self.detach();
    }
}
