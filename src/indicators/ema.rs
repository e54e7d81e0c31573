// =============================================================================
// Exponential Moving Average (EMA) — span-based, first-value seed
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha = 2 / (span + 1)
//   EMA_0 = x_0
//   EMA_t = x_t * alpha + EMA_{t-1} * (1 - alpha)
//
// The series is seeded with the FIRST value, not an SMA of the first `span`
// values, so the output is defined at every index and aligns one-to-one with
// the input.  The MACD stack depends on this alignment.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// The output has the same length as the input; element i corresponds to
/// `values[i]`.
///
/// # Edge cases
/// - `span == 0` => empty vec (division by zero guard)
/// - empty input => empty vec
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span + 1) as f64;

    let mut result = Vec::with_capacity(values.len());
    let mut prev = values[0];
    result.push(prev);

    for &x in &values[1..] {
        let ema = x * alpha + prev * (1.0 - alpha);
        result.push(ema);
        prev = ema;
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_span_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_single_value_is_that_value() {
        let ema = calculate_ema(&[7.5], 12);
        assert_eq!(ema, vec![7.5]);
    }

    #[test]
    fn ema_output_aligns_with_input() {
        let values: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let ema = calculate_ema(&values, 12);
        assert_eq!(ema.len(), values.len());
    }

    #[test]
    fn ema_known_values() {
        // span 3 => alpha = 0.5, seeded with the first value.
        let values = vec![2.0, 4.0, 8.0];
        let ema = calculate_ema(&values, 3);
        assert!((ema[0] - 2.0).abs() < 1e-10);
        assert!((ema[1] - 3.0).abs() < 1e-10); // 4*0.5 + 2*0.5
        assert!((ema[2] - 5.5).abs() < 1e-10); // 8*0.5 + 3*0.5
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let ema = calculate_ema(&vec![100.0; 80], 26);
        for &v in &ema {
            assert!((v - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ema_tracks_between_min_and_max() {
        let values = vec![10.0, 12.0, 11.0, 13.0, 9.0, 10.5, 12.5];
        let ema = calculate_ema(&values, 5);
        for &v in &ema {
            assert!((9.0..=13.0).contains(&v));
        }
    }
}
