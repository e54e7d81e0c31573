// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD        = EMA(close, 12) − EMA(close, 26)
// MACD_Signal = EMA(MACD, 9)
// MACD_Hist   = MACD − MACD_Signal
//
// All three series are defined at every index because the underlying EMAs are
// seeded with the first close (see `ema.rs`).  On a constant price series the
// fast and slow EMAs coincide, so MACD and the histogram are identically zero.
// =============================================================================

use super::ema::calculate_ema;

/// Span of the fast EMA.
const FAST_SPAN: usize = 12;
/// Span of the slow EMA.
const SLOW_SPAN: usize = 26;
/// Span of the signal-line EMA over the MACD series.
const SIGNAL_SPAN: usize = 9;

/// The MACD oscillator family, aligned index-for-index with the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD, signal line, and histogram for `closes`.
///
/// Returns empty series for empty input.
pub fn calculate_macd(closes: &[f64]) -> MacdSeries {
    if closes.is_empty() {
        return MacdSeries {
            macd: Vec::new(),
            signal: Vec::new(),
            histogram: Vec::new(),
        };
    }

    let fast = calculate_ema(closes, FAST_SPAN);
    let slow = calculate_ema(closes, SLOW_SPAN);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&macd, SIGNAL_SPAN);
    let histogram: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}
