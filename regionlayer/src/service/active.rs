//! Liveness table of outstanding tile requests.
//!
//! A request is delivered only if, when its resolution finishes, the table
//! still holds the same request id under its tile key. Superseding requests,
//! per-request cancellation and layer detach all remove or cancel entries,
//! so a late result is dropped instead of reaching a consumer that no longer
//! wants it.

use crate::coord::TileKey;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Lifecycle of one tile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Registered, not yet picked up
    Requested,
    /// Lookup or render in progress
    Resolving,
    /// Result handed to the consumer
    Delivered,
    /// Superseded, cancelled or detached; never delivered
    Cancelled,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Requested => "requested",
            RequestState::Resolving => "resolving",
            RequestState::Delivered => "delivered",
            RequestState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct ActiveRequest {
    id: u64,
    state: RequestState,
    token: CancellationToken,
}

/// Outstanding requests of one consumer, keyed by tile.
#[derive(Debug, Default)]
pub struct ActiveRequests {
    entries: DashMap<TileKey, ActiveRequest>,
    detached: AtomicBool,
}

impl ActiveRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request as live.
    ///
    /// An older request for the same tile is cancelled and replaced. Returns
    /// `false` without registering once the table has been detached.
    pub fn register(&self, key: TileKey, id: u64, token: CancellationToken) -> bool {
        if self.is_detached() {
            return false;
        }

        let request = ActiveRequest {
            id,
            state: RequestState::Requested,
            token,
        };
        if let Some(previous) = self.entries.insert(key, request) {
            previous.token.cancel();
            debug!(tile = %key, superseded = previous.id, by = id, "Tile request superseded");
        }
        true
    }

    /// Move a live request to `state`. Returns `false` if it is no longer live.
    pub fn set_state(&self, key: &TileKey, id: u64, state: RequestState) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.id == id => {
                entry.state = state;
                true
            }
            _ => false,
        }
    }

    /// Retire a request whose resolution has finished.
    ///
    /// Returns `Delivered` when the request was still registered and not
    /// cancelled, and `Cancelled` otherwise. A newer request for the same
    /// tile is left in place.
    pub fn complete(&self, key: &TileKey, id: u64) -> RequestState {
        match self.entries.remove_if(key, |_, r| r.id == id) {
            Some((_, request)) if !request.token.is_cancelled() => RequestState::Delivered,
            _ => RequestState::Cancelled,
        }
    }

    /// Cancel one request. Returns whether it was live.
    pub fn cancel(&self, key: &TileKey, id: u64) -> bool {
        match self.entries.remove_if(key, |_, r| r.id == id) {
            Some((_, request)) => {
                request.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every request and refuse new registrations.
    ///
    /// Returns the number of requests cancelled. Idempotent.
    pub fn detach(&self) -> usize {
        self.detached.store(true, Ordering::Release);
        let mut cancelled = 0;
        self.entries.retain(|_, request| {
            request.token.cancel();
            cancelled += 1;
            false
        });
        cancelled
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    /// Current state of the live request for `key`, if any.
    pub fn state(&self, key: &TileKey) -> Option<RequestState> {
        self.entries.get(key).map(|r| r.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
