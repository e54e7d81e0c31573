// =============================================================================
// History Provider REST Client — daily OHLCV bars
// =============================================================================
//
// Thin client for the daily-history endpoint.  The provider is treated as an
// opaque source of bars: one GET per (symbol, start, end) request, a JSON
// array response, and a bounded retry loop for transient failures.  Numeric
// fields may arrive as strings and are parsed tolerantly; malformed entries
// are skipped with a warning rather than failing the whole fetch.
//
// Bars are sorted by date ascending before return — downstream indicator
// computation relies on that ordering as a precondition.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::config::AppConfig;
use crate::market_data::DailyBar;

/// REST client for the daily-history provider.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HistoryClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `HistoryClient` from the service configuration.
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        debug!(base_url = %config.provider_base_url, "HistoryClient initialised");

        Self {
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
            client,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    // -------------------------------------------------------------------------
    // Daily history
    // -------------------------------------------------------------------------

    /// GET /api/v1/history/daily — fetch daily bars for `symbol` over
    /// `[start, end]` (both `YYYYMMDD`).
    ///
    /// Retries transient failures up to the configured `max_retries` with a
    /// fixed delay between attempts, then surfaces the last error.
    #[instrument(skip(self), name = "provider::daily_history")]
    pub async fn daily_history(
        &self,
        symbol: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<DailyBar>> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay).await;
            }

            match self.fetch_once(symbol, start, end).await {
                Ok(bars) => {
                    debug!(symbol, count = bars.len(), attempt, "daily history fetched");
                    return Ok(bars);
                }
                Err(e) => {
                    warn!(symbol, attempt, error = %e, "daily history fetch failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| anyhow::anyhow!("daily history fetch failed with no attempts")))
    }

    async fn fetch_once(&self, symbol: &str, start: &str, end: &str) -> Result<Vec<DailyBar>> {
        let url = format!(
            "{}/api/v1/history/daily?symbol={}&start={}&end={}",
            self.base_url, symbol, start, end
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v1/history/daily request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse history response")?;

        if !status.is_success() {
            anyhow::bail!("provider GET /api/v1/history/daily returned {}: {}", status, body);
        }

        let raw = body
            .as_array()
            .context("history response is not an array")?;

        Ok(parse_bars(raw))
    }
}

// =============================================================================
// Response parsing
// =============================================================================

/// Parse a JSON array of bar objects, skipping malformed entries, and return
/// the survivors sorted by date ascending.
fn parse_bars(raw: &[serde_json::Value]) -> Vec<DailyBar> {
    let mut bars = Vec::with_capacity(raw.len());

    for entry in raw {
        match parse_bar(entry) {
            Ok(bar) => bars.push(bar),
            Err(e) => warn!(error = %e, "skipping malformed history entry"),
        }
    }

    bars.sort_by_key(|b| b.date);
    bars
}

/// Parse a single bar object.  Numeric fields may be JSON numbers or strings.
fn parse_bar(entry: &serde_json::Value) -> Result<DailyBar> {
    let date_str = entry["date"]
        .as_str()
        .context("bar entry missing 'date' string")?;
    let date = parse_date(date_str)?;

    Ok(DailyBar {
        date,
        open: field_f64(entry, "open")?,
        close: field_f64(entry, "close")?,
        high: field_f64(entry, "high")?,
        low: field_f64(entry, "low")?,
        volume: field_f64(entry, "volume")? as u64,
        amount: field_f64(entry, "amount")?,
        amplitude: field_f64(entry, "amplitude")?,
        change_pct: field_f64(entry, "change_pct")?,
        change_amount: field_f64(entry, "change_amount")?,
        turnover_rate: field_f64(entry, "turnover_rate")?,
    })
}

/// Accept both `YYYY-MM-DD` and `YYYYMMDD` date spellings.
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .with_context(|| format!("failed to parse date '{s}'"))
}

fn field_f64(entry: &serde_json::Value, key: &str) -> Result<f64> {
    parse_str_f64(&entry[key]).with_context(|| format!("bad '{key}' field"))
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}
