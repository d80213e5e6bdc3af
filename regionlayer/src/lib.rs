//! RegionLayer - political-region boundary tiles with highlight-aware caching
//!
//! This library renders region boundaries onto slippy-map tiles and keeps two
//! cache tiers: persistent base tiles (no highlights) and in-memory composed
//! tiles keyed by the highlighted regions that touch each tile. Changing the
//! highlighted set only evicts the composed tiles it geometrically affects.
//!
//! # High-Level API
//!
//! The [`service`] module is the entry point for viewports:
//!
//! ```ignore
//! use regionlayer::boundary::BoundaryStore;
//! use regionlayer::cache::DiskTileStore;
//! use regionlayer::service::{EngineConfig, TileEngine, TileLayer};
//!
//! let boundaries = Arc::new(BoundaryStore::from_rings("2024.1", 500, rings));
//! let store = Arc::new(DiskTileStore::new(cache_dir)?);
//! let engine = Arc::new(TileEngine::new(boundaries, store, EngineConfig::default())?);
//!
//! let layer = TileLayer::new(engine, tokio::runtime::Handle::current());
//! layer.update_highlighted_regions(["us-ca", "us-nv"]);
//! let tile = layer.request_tile(5, 5, 12).wait().await;
//! ```

pub mod boundary;
pub mod cache;
pub mod config;
pub mod coord;
pub mod highlight;
pub mod logging;
pub mod raster;
pub mod service;

/// Version of the RegionLayer library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
