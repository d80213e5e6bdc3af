//! Cache statistics tracking and reporting.

use std::time::Instant;

/// Cache statistics for monitoring and debugging.
///
/// Each cache tier records into its own instance; [`CacheStats::absorb_base`]
/// folds a base-store snapshot into the engine's view.
#[derive(Debug, Clone)]
pub struct CacheStats {
    // Composed (in-memory) cache metrics
    pub composed_hits: u64,
    pub composed_misses: u64,
    pub composed_insertions: u64,
    pub composed_evictions: u64,
    pub composed_invalidations: u64,
    pub composed_entry_count: usize,

    // Base tile store metrics
    pub base_hits: u64,
    pub base_misses: u64,
    pub base_writes: u64,
    pub base_write_failures: u64,
    pub base_corrupt_entries: u64,
    pub base_clears: u64,
    pub base_entry_count: usize,
    pub base_size_bytes: u64,

    // Rendering metrics
    pub renders: u64,
    pub render_failures: u64,

    // Timing
    pub created_at: Instant,
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            composed_hits: 0,
            composed_misses: 0,
            composed_insertions: 0,
            composed_evictions: 0,
            composed_invalidations: 0,
            composed_entry_count: 0,
            base_hits: 0,
            base_misses: 0,
            base_writes: 0,
            base_write_failures: 0,
            base_corrupt_entries: 0,
            base_clears: 0,
            base_entry_count: 0,
            base_size_bytes: 0,
            renders: 0,
            render_failures: 0,
            created_at: Instant::now(),
        }
    }

    /// Composed cache hit rate (0.0 to 1.0).
    pub fn composed_hit_rate(&self) -> f64 {
        ratio(self.composed_hits, self.composed_hits + self.composed_misses)
    }

    /// Base store hit rate (0.0 to 1.0).
    pub fn base_hit_rate(&self) -> f64 {
        ratio(self.base_hits, self.base_hits + self.base_misses)
    }

    /// Share of lookups served without rendering (0.0 to 1.0).
    ///
    /// A composed miss falls through to the base store, so total lookups are
    /// composed hits plus every base lookup.
    pub fn overall_hit_rate(&self) -> f64 {
        let hits = self.composed_hits + self.base_hits;
        ratio(hits, hits + self.base_misses)
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    pub fn record_composed_hit(&mut self) {
        self.composed_hits += 1;
    }

    pub fn record_composed_miss(&mut self) {
        self.composed_misses += 1;
    }

    pub fn record_composed_insertion(&mut self) {
        self.composed_insertions += 1;
    }

    pub fn record_composed_eviction(&mut self, count: u64) {
        self.composed_evictions += count;
    }

    pub fn record_composed_invalidation(&mut self, count: u64) {
        self.composed_invalidations += count;
    }

    pub fn record_base_hit(&mut self) {
        self.base_hits += 1;
    }

    pub fn record_base_miss(&mut self) {
        self.base_misses += 1;
    }

    pub fn record_base_write(&mut self) {
        self.base_writes += 1;
    }

    pub fn record_base_write_failure(&mut self) {
        self.base_write_failures += 1;
    }

    pub fn record_base_corrupt_entry(&mut self) {
        self.base_corrupt_entries += 1;
    }

    pub fn record_base_clear(&mut self) {
        self.base_clears += 1;
    }

    pub fn record_render(&mut self) {
        self.renders += 1;
    }

    pub fn record_render_failure(&mut self) {
        self.render_failures += 1;
    }

    /// Update composed cache size metrics.
    pub fn update_composed_size(&mut self, entry_count: usize) {
        self.composed_entry_count = entry_count;
    }

    /// Update base store size metrics.
    pub fn update_base_size(&mut self, size_bytes: u64, entry_count: usize) {
        self.base_size_bytes = size_bytes;
        self.base_entry_count = entry_count;
    }

    /// Copy the base-store fields of `base` into `self`.
    pub fn absorb_base(&mut self, base: &CacheStats) {
        self.base_hits = base.base_hits;
        self.base_misses = base.base_misses;
        self.base_writes = base.base_writes;
        self.base_write_failures = base.base_write_failures;
        self.base_corrupt_entries = base.base_corrupt_entries;
        self.base_clears = base.base_clears;
        self.base_entry_count = base.base_entry_count;
        self.base_size_bytes = base.base_size_bytes;
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Snapshot of cache statistics for reporting.
#[derive(Debug, Clone)]
pub struct CacheStatistics {
    pub stats: CacheStats,
    pub composed_hit_rate_percent: f64,
    pub base_hit_rate_percent: f64,
    pub overall_hit_rate_percent: f64,
    pub uptime_secs: u64,
}

impl CacheStatistics {
    pub fn from_stats(stats: &CacheStats) -> Self {
        Self {
            stats: stats.clone(),
            composed_hit_rate_percent: stats.composed_hit_rate() * 100.0,
            base_hit_rate_percent: stats.base_hit_rate() * 100.0,
            overall_hit_rate_percent: stats.overall_hit_rate() * 100.0,
            uptime_secs: stats.uptime().as_secs(),
        }
    }

    /// Format statistics as a human-readable string.
    pub fn format(&self, data_version: &str) -> String {
        let stats = &self.stats;

        format!(
            r#"RegionLayer Cache Statistics
Data version: {}

COMPOSED TILES (memory)
  Entries:        {}
  Hits:           {}
  Misses:         {}
  Hit Rate:       {:.1}%
  Insertions:     {}
  Evictions:      {}
  Invalidations:  {}

BASE TILES (persistent)
  Entries:        {}
  Size:           {:.2} MB
  Hits:           {}
  Misses:         {}
  Hit Rate:       {:.1}%
  Writes:         {}
  Failures:       {}
  Corrupt:        {}
  Clears:         {}

RENDERING
  Renders:        {}
  Failures:       {}

OVERALL
  Hit Rate:       {:.1}%
  Uptime:         {}s
"#,
            data_version,
            stats.composed_entry_count,
            stats.composed_hits,
            stats.composed_misses,
            self.composed_hit_rate_percent,
            stats.composed_insertions,
            stats.composed_evictions,
            stats.composed_invalidations,
            stats.base_entry_count,
            stats.base_size_bytes as f64 / (1024.0 * 1024.0),
            stats.base_hits,
            stats.base_misses,
            self.base_hit_rate_percent,
            stats.base_writes,
            stats.base_write_failures,
            stats.base_corrupt_entries,
            stats.base_clears,
            stats.renders,
            stats.render_failures,
            self.overall_hit_rate_percent,
            self.uptime_secs,
        )
    }
}
