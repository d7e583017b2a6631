// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// The arithmetic mean of the close over a trailing fixed-size window.  The
// output is index-aligned with the input: position `i` holds the mean of
// `closes[i - window + 1 ..= i]`, and the first `window - 1` positions are
// `None` because the window has not filled yet.  Callers must treat `None`
// as "not yet available", never as zero.
// =============================================================================

use super::IndicatorError;

/// Compute the aligned SMA series for `closes` with the given `window`.
///
/// # Edge cases
/// - `window == 0` => `InvalidInput`
/// - empty `closes` => `InvalidInput`
/// - `window > closes.len()` => every position is `None` (all warm-up)
/// - `window == 1` => the output equals the input exactly
pub fn simple_moving_average(
    closes: &[f64],
    window: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidInput("window must be at least 1"));
    }
    if closes.is_empty() {
        return Err(IndicatorError::InvalidInput("series is empty"));
    }

    let mut result = vec![None; closes.len()];

    // Each window is summed directly.  A rolling add/subtract would be
    // faster but accumulates floating-point error and would break the
    // window==1 identity guarantee; the dashboard series are small enough
    // that O(n * window) does not matter.
    for i in (window - 1)..closes.len() {
        let sum: f64 = closes[i + 1 - window..=i].iter().sum();
        result[i] = Some(sum / window as f64);
    }

    Ok(result)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_rejects_zero_window() {
        assert_eq!(
            simple_moving_average(&[1.0, 2.0], 0),
            Err(IndicatorError::InvalidInput("window must be at least 1"))
        );
    }

    #[test]
    fn sma_rejects_empty_series() {
        assert!(simple_moving_average(&[], 3).is_err());
    }

    #[test]
    fn sma_warmup_then_defined() {
        // Length L, window w: exactly w-1 leading None, L-w+1 defined values.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = simple_moving_average(&closes, 4).unwrap();
        assert_eq!(out.len(), closes.len());
        assert!(out[..3].iter().all(Option::is_none));
        assert!(out[3..].iter().all(Option::is_some));
        assert_eq!(out.iter().flatten().count(), 10 - 4 + 1);
    }

    #[test]
    fn sma_window_one_is_identity() {
        let closes = [10.5, 11.25, 9.75, 12.0];
        let out = simple_moving_average(&closes, 1).unwrap();
        for (c, v) in closes.iter().zip(&out) {
            assert_eq!(v.unwrap(), *c);
        }
    }

    #[test]
    fn sma_values_are_window_means() {
        let closes = [2.0, 4.0, 6.0, 8.0, 10.0];
        let out = simple_moving_average(&closes, 3).unwrap();
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!((out[2].unwrap() - 4.0).abs() < 1e-12);
        assert!((out[3].unwrap() - 6.0).abs() < 1e-12);
        assert!((out[4].unwrap() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn sma_window_longer_than_series_is_all_none() {
        let out = simple_moving_average(&[1.0, 2.0, 3.0], 20).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(Option::is_none));
    }
}
