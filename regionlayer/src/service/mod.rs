//! Request coordination for map viewports.
//!
//! ```text
//!  viewport ──request_tile──► TileLayer ──spawn──► TileEngine::resolve
//!     ▲                          │                      │
//!     │                    ActiveRequests        composed cache ─► base store ─► render
//!     │                     (liveness)                  │
//!     └──── TileResponse ◄── deliver if still live ◄────┘
//! ```
//!
//! The [`TileEngine`] is shared by every consumer and owns the caches and
//! the highlighted set. Each consumer holds a [`TileLayer`], which tracks its
//! own outstanding requests and guarantees nothing is delivered after it is
//! detached.
//!
//! # Example
//!
//! ```ignore
//! use regionlayer::service::{EngineConfig, TileEngine, TileLayer};
//!
//! let engine = Arc::new(TileEngine::new(boundaries, store, EngineConfig::default())?);
//! let layer = TileLayer::new(Arc::clone(&engine), tokio::runtime::Handle::current());
//!
//! layer.update_highlighted_regions(["us-ca"]);
//! if let Some(tile) = layer.request_tile(4, 2, 6).wait().await {
//!     let png = tile.encode_png()?;
//! }
//! ```

mod active;
mod engine;
mod error;
mod layer;
mod prewarm;

pub use active::{ActiveRequests, RequestState};
pub use engine::{base_store_version, EngineConfig, InvalidationReport, TileEngine};
pub use error::ServiceError;
pub use layer::{LayerStats, TileLayer, TileResponse};
pub use prewarm::{prewarm, PrewarmConfig, PrewarmReport, DEFAULT_PREWARM_CONCURRENCY};
