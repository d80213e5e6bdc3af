//! The set of highlighted ("found") region identifiers.

use crate::boundary::BoundaryStore;
use crate::coord::GeoBounds;
use std::collections::BTreeSet;

/// Sorted set of highlighted region identifiers.
///
/// Sorted iteration makes every derived list (intersections, fingerprints,
/// differences) deterministic regardless of the order ids were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    ids: BTreeSet<String>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Ids present in exactly one of the two sets, sorted.
    pub fn symmetric_difference(&self, other: &HighlightSet) -> Vec<String> {
        self.ids.symmetric_difference(&other.ids).cloned().collect()
    }

    /// Highlighted ids whose region has a polygon overlapping `area`, sorted.
    ///
    /// Ids unknown to the boundary store are ignored.
    pub fn intersecting(&self, boundaries: &BoundaryStore, area: &GeoBounds) -> Vec<String> {
        self.ids
            .iter()
            .filter(|id| boundaries.get(id).is_some_and(|r| r.intersects(area)))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for HighlightSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
