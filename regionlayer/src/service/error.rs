//! Service error types.

use crate::cache::CacheError;
use crate::coord::CoordError;
use crate::raster::RenderError;
use std::fmt;

/// Errors that can occur while resolving or pre-warming tiles.
///
/// A tile request never surfaces these to the viewport; they are logged and
/// the request resolves to `None`.
#[derive(Debug)]
pub enum ServiceError {
    /// Rendering or encoding failed
    Render(RenderError),
    /// The base tile store failed
    Cache(CacheError),
    /// Invalid tile key or zoom range
    Coord(CoordError),
    /// A blocking task panicked or was aborted
    TaskFailed(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(e) => write!(f, "Render error: {}", e),
            Self::Cache(e) => write!(f, "Cache error: {}", e),
            Self::Coord(e) => write!(f, "Coordinate error: {}", e),
            Self::TaskFailed(msg) => write!(f, "Tile task failed: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(e) => Some(e),
            Self::Cache(e) => Some(e),
            Self::Coord(e) => Some(e),
            Self::TaskFailed(_) => None,
        }
    }
}

impl From<RenderError> for ServiceError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<CacheError> for ServiceError {
    fn from(e: CacheError) -> Self {
        Self::Cache(e)
    }
}

impl From<CoordError> for ServiceError {
    fn from(e: CoordError) -> Self {
        Self::Coord(e)
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::TaskFailed(e.to_string())
    }
}
