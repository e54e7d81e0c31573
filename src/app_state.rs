// =============================================================================
// Central Application State — Meridian Analysis Service
// =============================================================================
//
// Ties the configuration, the analysis pipeline, and the service counters
// together behind one `Arc<AppState>`.  Each analysis request is a stateless
// computation; the only mutable shared state is the counter block.
//
// Thread safety:
//   - parking_lot::RwLock around the counters.
//   - The analyzer itself is immutable and safe to share.
// =============================================================================

use std::time::Instant;

use anyhow::Result;
use parking_lot::RwLock;
use serde::Serialize;

use crate::analysis::{DataOrigin, StockAnalyzer};
use crate::cache::FileCache;
use crate::config::AppConfig;
use crate::provider::HistoryClient;

/// Running counters exposed on the health endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ServiceStats {
    /// Successfully served analysis requests.
    pub analyses_served: u64,
    /// Requests answered from a fresh cache entry.
    pub cache_hits: u64,
    /// Requests that had to go to the provider.
    pub cache_misses: u64,
    /// Requests that ended in an error response.
    pub failures: u64,
}

/// Central application state shared across request handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: AppConfig,
    pub analyzer: StockAnalyzer,
    pub stats: RwLock<ServiceStats>,
    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: Instant,
}

impl AppState {
    /// Construct the full service state from the given configuration.
    ///
    /// Opens (and creates if needed) the cache directory; fails if it cannot
    /// be created.
    pub fn new(config: AppConfig) -> Result<Self> {
        let provider = HistoryClient::new(&config);
        let cache = FileCache::new(&config.cache_dir, config.cache_expiry_secs)?;
        let analyzer = StockAnalyzer::new(provider, cache);

        Ok(Self {
            config,
            analyzer,
            stats: RwLock::new(ServiceStats::default()),
            start_time: Instant::now(),
        })
    }

    // ── Counter updates ─────────────────────────────────────────────────

    /// Record a successfully served analysis and where its bars came from.
    pub fn record_success(&self, origin: DataOrigin) {
        let mut stats = self.stats.write();
        stats.analyses_served += 1;
        match origin {
            DataOrigin::Cache => stats.cache_hits += 1,
            DataOrigin::Provider => stats.cache_misses += 1,
        }
    }

    /// Record a request that ended in an error response.
    pub fn record_failure(&self) {
        self.stats.write().failures += 1;
    }

    /// Copy of the current counters.
    pub fn stats_snapshot(&self) -> ServiceStats {
        *self.stats.read()
    }

    /// Seconds since service start.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
