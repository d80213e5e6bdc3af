//! Two-tier tile cache.
//!
//! ```text
//!            ┌────────────────────────────┐
//! request ──►│ ComposedTileCache (memory) │ key: (tile, overlay fingerprint)
//!            └─────────────┬──────────────┘
//!                     miss │
//!            ┌─────────────▼──────────────┐
//!            │ BaseTileStore (persistent) │ key: tile, plus data version
//!            └─────────────┬──────────────┘
//!                     miss │
//!                       render
//! ```
//!
//! Base tiles carry no highlight state and survive restarts until the
//! boundary data version changes. Composed tiles are bounded by strict LRU
//! and selectively invalidated when the highlighted set changes.

mod composed;
mod disk;
mod fingerprint;
mod memory;
mod path;
mod stats;
mod r#trait;
mod types;

pub use composed::{ComposedTileCache, DEFAULT_COMPOSED_ENTRIES};
pub use disk::DiskTileStore;
pub use fingerprint::{compute_fingerprint, Fingerprint};
pub use memory::MemoryTileStore;
pub use r#trait::{BaseTileStore, NoOpTileStore};
pub use stats::{CacheStatistics, CacheStats};
pub use types::{CacheError, ComposedKey};

pub use path::{parse_tile_path, tile_path, tiles_directory, version_path};
