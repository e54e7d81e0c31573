// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.  The first
//          bar has no predecessor; it contributes zero gain and zero loss.
// Step 2 — avg_gain / avg_loss are 14-period SIMPLE rolling means of the
//          per-bar gains and losses (not Wilder's exponential smoothing).
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Two columns are produced from the single RS series:
//   rsi6  — the direct transform of the 14-period RS
//   rsi12 — the transform of a further 12-period mean of RS
// The column names follow the dashboard's chart legend.
//
// Thresholds:  RSI > 70 => strong momentum,  RSI < 30 => weak momentum.
// =============================================================================

use super::sma::rolling_mean;

/// Window of the gain/loss rolling means.
const RSI_WINDOW: usize = 14;
/// Window of the extra RS smoothing behind the `rsi12` column.
const RS_SMOOTH_WINDOW: usize = 12;

/// The RSI oscillator pair, aligned index-for-index with the input closes.
///
/// `rsi6` is defined from index 13 onward; `rsi12` from index 24 onward.
/// Earlier positions are `None`.
#[derive(Debug, Clone)]
pub struct RsiSeries {
    pub rsi6: Vec<Option<f64>>,
    pub rsi12: Vec<Option<f64>>,
}

/// Compute the `rsi6`/`rsi12` pair for `closes`.
///
/// Both columns are within [0, 100] wherever defined.
///
/// # Edge cases
/// - A window with no movement at all (zero gains AND zero losses) reads as
///   RSI 50.0 — neutral.
/// - A window with gains and no losses reads as RSI 100.0.
/// - A window with losses and no gains reads as RSI 0.0 (falls out of the
///   formula directly: RS = 0).
pub fn calculate_rsi(closes: &[f64]) -> RsiSeries {
    let n = closes.len();

    // --- Per-bar gains and losses -------------------------------------------
    // Index 0 has no delta and contributes zero to both columns.
    let mut gains = vec![0.0_f64; n];
    let mut losses = vec![0.0_f64; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    let avg_gain = rolling_mean(&gains, RSI_WINDOW);
    let avg_loss = rolling_mean(&losses, RSI_WINDOW);

    // --- RS series -----------------------------------------------------------
    // NaN marks a flat window (no movement); +inf marks a gain-only window.
    // Both are resolved to concrete RSI values in `rsi_from_rs`.
    let rs: Vec<Option<f64>> = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => Some(rs_value(*g, *l)),
            _ => None,
        })
        .collect();

    let rsi6: Vec<Option<f64>> = rs.iter().map(|r| r.map(rsi_from_rs)).collect();

    // --- rsi12: 12-period mean of RS, then the same transform ----------------
    let mut rsi12 = vec![None; n];
    if n >= RSI_WINDOW + RS_SMOOTH_WINDOW - 1 {
        for i in (RSI_WINDOW + RS_SMOOTH_WINDOW - 2)..n {
            // Window fully inside the defined region of `rs`.
            let sum: f64 = rs[i + 1 - RS_SMOOTH_WINDOW..=i]
                .iter()
                .map(|r| r.unwrap_or(f64::NAN))
                .sum();
            rsi12[i] = Some(rsi_from_rs(sum / RS_SMOOTH_WINDOW as f64));
        }
    }

    RsiSeries { rsi6, rsi12 }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Relative strength of one window of averages.
///
/// - avg_loss > 0  => the plain ratio.
/// - gains only    => +inf (saturates RSI at 100).
/// - no movement   => NaN (resolved to the neutral 50 in `rsi_from_rs`).
fn rs_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss > 0.0 {
        avg_gain / avg_loss
    } else if avg_gain > 0.0 {
        f64::INFINITY
    } else {
        f64::NAN
    }
}

/// Convert an RS reading into an RSI value in [0, 100].
///
/// NaN (no movement) maps to 50.0 — neutral.  +inf maps to 100.0 via the
/// formula itself.
fn rsi_from_rs(rs: f64) -> f64 {
    if rs.is_nan() {
        50.0
    } else {
        100.0 - 100.0 / (1.0 + rs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        let out = calculate_rsi(&[]);
        assert!(out.rsi6.is_empty());
        assert!(out.rsi12.is_empty());
    }

    #[test]
    fn rsi_short_series_is_all_none() {
        let closes: Vec<f64> = (1..=13).map(|x| x as f64).collect();
        let out = calculate_rsi(&closes);
        assert!(out.rsi6.iter().all(Option::is_none));
        assert!(out.rsi12.iter().all(Option::is_none));
    }

    #[test]
    fn rsi6_defined_from_index_13() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let out = calculate_rsi(&closes);
        assert!(out.rsi6[12].is_none());
        assert!(out.rsi6[13].is_some());
    }

    #[test]
    fn rsi12_defined_from_index_24() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let out = calculate_rsi(&closes);
        assert!(out.rsi12[23].is_none());
        assert!(out.rsi12[24].is_some());
    }

    #[test]
    fn rsi_all_gains_saturates_at_100() {
        // Strictly ascending prices => no losses in any window.
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let out = calculate_rsi(&closes);
        for v in out.rsi6.iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
        for v in out.rsi12.iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses_reads_zero() {
        let closes: Vec<f64> = (1..=40).rev().map(|x| x as f64).collect();
        let out = calculate_rsi(&closes);
        for v in out.rsi6.iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_neutral() {
        // No price change at all => RSI = 50 in both columns.
        let closes = vec![100.0; 40];
        let out = calculate_rsi(&closes);
        for v in out.rsi6.iter().flatten() {
            assert!((v - 50.0).abs() < 1e-10, "expected 50.0, got {v}");
        }
        for v in out.rsi12.iter().flatten() {
            assert!((v - 50.0).abs() < 1e-10, "expected 50.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        // Arbitrary data — both columns must stay in [0, 100] where defined.
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13, 43.50, 44.01, 43.80, 44.20, 44.90, 45.20,
            45.00, 44.70, 45.10, 45.60, 45.30, 45.80,
        ];
        let out = calculate_rsi(&closes);
        for v in out.rsi6.iter().flatten() {
            assert!((0.0..=100.0).contains(v), "rsi6 {v} out of range");
        }
        for v in out.rsi12.iter().flatten() {
            assert!((0.0..=100.0).contains(v), "rsi12 {v} out of range");
        }
    }

    #[test]
    fn rsi_output_aligns_with_input() {
        let closes: Vec<f64> = (1..=50).map(|x| (x % 7) as f64 + 10.0).collect();
        let out = calculate_rsi(&closes);
        assert_eq!(out.rsi6.len(), closes.len());
        assert_eq!(out.rsi12.len(), closes.len());
    }
}
