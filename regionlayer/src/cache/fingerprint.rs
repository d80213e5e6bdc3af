//! Overlay fingerprints.

use sha2::{Digest, Sha256};
use std::fmt;

/// Stable identity of the highlight overlay drawn on one tile.
///
/// Computed from the sorted, de-duplicated region ids, so the order ids are
/// supplied in never matters. The hash is SHA-256 truncated to 64 bits and
/// is stable across processes and platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fingerprint {
    /// No overlay: the tile is the plain base tile
    None,
    /// Overlay of a non-empty set of regions
    Overlay(u64),
}

impl Fingerprint {
    /// Fingerprint of a set of region ids.
    pub fn of<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<S> = ids.into_iter().collect();
        if ids.is_empty() {
            return Fingerprint::None;
        }
        ids.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        ids.dedup_by(|a, b| a.as_ref() == b.as_ref());

        let mut hasher = Sha256::new();
        for id in &ids {
            hasher.update(id.as_ref().as_bytes());
            // Separator keeps ["ab", "c"] distinct from ["a", "bc"]
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Fingerprint::Overlay(u64::from_be_bytes(prefix))
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Fingerprint::None)
    }
}

/// Fingerprint of the highlighted region ids relevant to a tile.
pub fn compute_fingerprint<S: AsRef<str>>(ids: &[S]) -> Fingerprint {
    Fingerprint::of(ids)
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::None => write!(f, "none"),
            Fingerprint::Overlay(hash) => write!(f, "{:016x}", hash),
        }
    }
}
