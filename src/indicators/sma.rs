// =============================================================================
// Simple Moving Average (SMA) — windowed rolling mean
// =============================================================================
//
// For the element at index i, the mean of `values[i-w+1 ..= i]`.  The first
// `w - 1` positions have no full window and yield `None`; a partial-window
// average is never produced.
//
// This is the building block for the MA5/MA10/MA20/MA60 price overlays and
// for the gain/loss averages inside the RSI computation.
// =============================================================================

/// Compute the rolling mean of `values` over `window`, aligned with the input.
///
/// The output has the same length as `values`; position i is `None` until a
/// full window of `window` values ends there.
///
/// # Edge cases
/// - `window == 0` => all `None` (a zero-width mean is meaningless)
/// - `values.len() < window` => all `None`
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    // Running sum over the window; subtract the element that falls out.
    let mut sum: f64 = values[..window].iter().sum();
    result[window - 1] = Some(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        result[i] = Some(sum / window as f64);
    }

    result
}
