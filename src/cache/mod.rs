// =============================================================================
// File-backed bar cache — one JSON document per (symbol, start, end) key
// =============================================================================
//
// The cache exists to avoid the provider round-trip, so it stores RAW BARS
// ONLY; indicators, summary, and recommendation are recomputed on every read.
// A classification-rule change therefore never serves a stale verdict from
// inside the TTL window.
//
// Expiry is measured from the file's mtime.  Corrupt or unreadable entries
// are treated as absent, never fatal.  Writes are atomic (tmp + rename), the
// same pattern the config module uses.  A single writing process is assumed
// for the cache directory.
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::market_data::DailyBar;

/// Identifies one cached analysis request.  Dates are `YYYYMMDD` strings,
/// matching the provider query format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub symbol: String,
    pub start: String,
    pub end: String,
}

impl CacheKey {
    fn file_name(&self) -> String {
        format!("{}_{}_{}.json", self.symbol, self.start, self.end)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}..{}", self.symbol, self.start, self.end)
    }
}

/// TTL-based cache of daily-bar series under a single directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    expiry: Duration,
}

impl FileCache {
    /// Open (and create if needed) the cache directory.
    pub fn new(dir: impl Into<PathBuf>, expiry_secs: u64) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create cache dir {}", dir.display()))?;
        Ok(Self {
            dir,
            expiry: Duration::from_secs(expiry_secs),
        })
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Fetch the bars cached under `key`, if present and fresh.
    ///
    /// Returns `None` for a missing entry, an entry older than the expiry, or
    /// an entry that fails to parse (logged and ignored).
    pub fn load(&self, key: &CacheKey) -> Option<Vec<DailyBar>> {
        let path = self.path_for(key);

        let metadata = std::fs::metadata(&path).ok()?;
        let age = metadata
            .modified()
            .ok()
            .and_then(|t| t.elapsed().ok())
            .unwrap_or_default();
        if age >= self.expiry {
            debug!(key = %key, age_secs = age.as_secs(), "cache entry expired");
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read cache entry — treating as absent");
                return None;
            }
        };

        match serde_json::from_str::<Vec<DailyBar>>(&content) {
            Ok(bars) => {
                debug!(key = %key, bars = bars.len(), "cache hit");
                Some(bars)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "corrupt cache entry — treating as absent");
                None
            }
        }
    }

    /// Persist `bars` under `key` with an atomic write.
    pub fn store(&self, key: &CacheKey, bars: &[DailyBar]) -> Result<()> {
        let path = self.path_for(key);
        let content =
            serde_json::to_string(bars).context("failed to serialise bars for cache")?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp cache file {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("failed to rename tmp cache file to {}", path.display()))?;

        debug!(key = %key, bars = bars.len(), "cache entry stored");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bars(n: usize) -> Vec<DailyBar> {
        let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        (0..n)
            .map(|i| DailyBar {
                date: start + chrono::Days::new(i as u64),
                open: 10.0 + i as f64,
                close: 10.5 + i as f64,
                high: 11.0 + i as f64,
                low: 9.5 + i as f64,
                volume: 1_000 + i as u64,
                amount: 10_500.0,
                amplitude: 1.5,
                change_pct: 0.3,
                change_amount: 0.03,
                turnover_rate: 0.8,
            })
            .collect()
    }

    fn key(symbol: &str) -> CacheKey {
        CacheKey {
            symbol: symbol.to_string(),
            start: "20250101".to_string(),
            end: "20250601".to_string(),
        }
    }

    #[test]
    fn roundtrip_returns_equal_bars() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), 3600).unwrap();

        let bars = sample_bars(5);
        cache.store(&key("000001"), &bars).unwrap();

        let loaded = cache.load(&key("000001")).unwrap();
        assert_eq!(loaded, bars);
    }

    #[test]
    fn differing_key_component_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), 3600).unwrap();
        cache.store(&key("000001"), &sample_bars(3)).unwrap();

        // Different symbol.
        assert!(cache.load(&key("600519")).is_none());

        // Different start date.
        let mut k = key("000001");
        k.start = "20240101".to_string();
        assert!(cache.load(&k).is_none());

        // Different end date.
        let mut k = key("000001");
        k.end = "20250701".to_string();
        assert!(cache.load(&k).is_none());
    }

    #[test]
    fn zero_expiry_treats_everything_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), 0).unwrap();
        cache.store(&key("000001"), &sample_bars(3)).unwrap();
        assert!(cache.load(&key("000001")).is_none());
    }

    #[test]
    fn corrupt_entry_is_absent_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), 3600).unwrap();

        let path = dir.path().join("000001_20250101_20250601.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(cache.load(&key("000001")).is_none());
    }

    #[test]
    fn missing_entry_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), 3600).unwrap();
        assert!(cache.load(&key("000001")).is_none());
    }

    #[test]
    fn new_creates_nested_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = FileCache::new(&nested, 3600).unwrap();
        cache.store(&key("000001"), &sample_bars(1)).unwrap();
        assert!(cache.load(&key("000001")).is_some());
    }

    #[test]
    fn store_overwrites_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), 3600).unwrap();

        cache.store(&key("000001"), &sample_bars(2)).unwrap();
        cache.store(&key("000001"), &sample_bars(4)).unwrap();

        assert_eq!(cache.load(&key("000001")).unwrap().len(), 4);
    }
}
