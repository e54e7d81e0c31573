// =============================================================================
// Indicator Engine — per-bar derived columns over a daily series
// =============================================================================
//
// Takes an ordered series of daily bars and produces a new, immutable
// `AugmentedSeries` carrying one `IndicatorRow` per bar: the MA5/10/20/60
// overlays, the MACD family, and the RSI pair.  The input is never mutated.
//
// Ascending date order is a precondition established at the provider
// boundary; the engine does not re-sort or re-validate it.
//
// A series shorter than the largest window is NOT an error — rolling columns
// simply stay `None` in the early region.  Only an empty series is rejected.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::market_data::DailyBar;

use super::macd::calculate_macd;
use super::rsi::calculate_rsi;
use super::sma::rolling_mean;

/// Windows of the simple-moving-average price overlays.
const MA_WINDOWS: [usize; 4] = [5, 10, 20, 60];

/// Derived columns for a single bar.
///
/// Rolling columns are `None` until their window fills; the MACD family is
/// defined at every index because its EMAs seed with the first close.
/// `None` serialises as JSON null so the chart frontend keeps the columns
/// aligned with the bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub rsi6: Option<f64>,
    pub rsi12: Option<f64>,
}

/// An ordered bar series together with its derived columns, index-aligned.
///
/// Never reordered or truncated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentedSeries {
    pub bars: Vec<DailyBar>,
    pub rows: Vec<IndicatorRow>,
}

impl AugmentedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar and its derived row, if any.
    pub fn latest(&self) -> Option<(&DailyBar, &IndicatorRow)> {
        Some((self.bars.last()?, self.rows.last()?))
    }
}

/// Stateless computation of derived columns.
pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute all derived columns for `bars` and return the augmented series.
    ///
    /// Fails with `InvalidInput` only on an empty series.
    pub fn compute(bars: Vec<DailyBar>) -> AnalysisResult<AugmentedSeries> {
        if bars.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "cannot compute indicators over an empty series".to_string(),
            ));
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let [ma5, ma10, ma20, ma60] = MA_WINDOWS.map(|w| rolling_mean(&closes, w));
        let macd = calculate_macd(&closes);
        let rsi = calculate_rsi(&closes);

        let rows: Vec<IndicatorRow> = (0..bars.len())
            .map(|i| IndicatorRow {
                ma5: ma5[i],
                ma10: ma10[i],
                ma20: ma20[i],
                ma60: ma60[i],
                macd: macd.macd[i],
                macd_signal: macd.signal[i],
                macd_hist: macd.histogram[i],
                rsi6: rsi.rsi6[i],
                rsi12: rsi.rsi12[i],
            })
            .collect();

        Ok(AugmentedSeries { bars, rows })
    }
}
