// =============================================================================
// Stock Analyzer — cache → provider → engine → classifier orchestration
// =============================================================================
//
// One analysis request is one independent, stateless computation: resolve the
// raw bars (cache first, provider on miss), then derive indicators and the
// classification fresh.  Nothing is kept in memory across requests.
//
// Only raw bars are ever cached; see `cache/mod.rs` for the rationale.
// =============================================================================

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{CacheKey, FileCache};
use crate::error::{AnalysisError, AnalysisResult};
use crate::indicators::{AugmentedSeries, IndicatorEngine};
use crate::market_data::DailyBar;
use crate::provider::HistoryClient;
use crate::types::{Recommendation, TechnicalSummary};

use super::classifier::{classify, recommend};

/// Where the raw bars of a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    Cache,
    Provider,
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "Cache"),
            Self::Provider => write!(f, "Provider"),
        }
    }
}

/// Complete output of one analysis request — the entire contract the
/// presentation layer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique id of this analysis run, for log correlation.
    pub analysis_id: Uuid,
    pub symbol: String,
    /// Requested range start, `YYYYMMDD`.
    pub start: String,
    /// Requested range end, `YYYYMMDD`.
    pub end: String,
    /// ISO 8601 timestamp of report creation.
    pub generated_at: String,
    pub origin: DataOrigin,
    pub series: AugmentedSeries,
    pub summary: TechnicalSummary,
    pub recommendation: Recommendation,
}

/// End-to-end analysis pipeline over one symbol and date range.
pub struct StockAnalyzer {
    provider: HistoryClient,
    cache: FileCache,
}

impl StockAnalyzer {
    pub fn new(provider: HistoryClient, cache: FileCache) -> Self {
        Self { provider, cache }
    }

    /// Run a full analysis for `symbol` over `[start, end]` (both `YYYYMMDD`).
    ///
    /// Bars come from the cache when a fresh entry exists, otherwise from the
    /// provider (and are then cached).  Indicators and classification are
    /// always computed fresh.
    pub async fn analyze(
        &self,
        symbol: &str,
        start: &str,
        end: &str,
    ) -> AnalysisResult<AnalysisReport> {
        let key = CacheKey {
            symbol: symbol.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        };

        let (bars, origin) = match self.cache.load(&key) {
            Some(bars) if !bars.is_empty() => (bars, DataOrigin::Cache),
            _ => {
                let bars = self
                    .provider
                    .daily_history(symbol, start, end)
                    .await
                    .map_err(|e| {
                        AnalysisError::DataUnavailable(format!(
                            "history fetch for {symbol} failed: {e:#}"
                        ))
                    })?;

                if bars.is_empty() {
                    return Err(AnalysisError::DataUnavailable(format!(
                        "provider returned no bars for {symbol} in {start}..{end}"
                    )));
                }

                // A cache write failure degrades to an uncached response; the
                // analysis itself still succeeds.
                if let Err(e) = self.cache.store(&key, &bars) {
                    warn!(key = %key, error = %e, "failed to store cache entry");
                }

                (bars, DataOrigin::Provider)
            }
        };

        Self::build_report(symbol, start, end, bars, origin)
    }

    /// Derive indicators and classification for already-resolved bars and
    /// assemble the report.
    pub(crate) fn build_report(
        symbol: &str,
        start: &str,
        end: &str,
        bars: Vec<DailyBar>,
        origin: DataOrigin,
    ) -> AnalysisResult<AnalysisReport> {
        let series: AugmentedSeries = IndicatorEngine::compute(bars)?;
        let summary: TechnicalSummary = classify(&series)?;
        let recommendation = recommend(&summary);

        info!(
            symbol,
            bars = series.len(),
            origin = %origin,
            trend = %summary.trend,
            momentum = %summary.momentum,
            volatility = %summary.volatility,
            recommendation = %recommendation,
            "analysis complete"
        );

        Ok(AnalysisReport {
            analysis_id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            origin,
            series,
            summary,
            recommendation,
        })
    }
}
