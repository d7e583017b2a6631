// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether a stock is overbought or oversold.
//
// Step 1 — Compute day-over-day close deltas; the first close has no delta.
// Step 2 — Split each delta into gain = max(delta, 0), loss = max(-delta, 0).
// Step 3 — Take the plain rolling mean of gains and of losses over `window`
//          deltas.  This matches the dashboard's charted RSI; it is NOT
//          Wilder's exponentially smoothed variant.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Division edge cases have defined values instead of propagating NaN/inf:
// avg_loss == 0 with gains present saturates at 100, and a completely flat
// window is pinned to the neutral 50.  A naive ratio would leave those
// cells undefined and make the indicator unusable on flat-price stretches.
//
// Thresholds:  RSI > 70 => overbought,  RSI < 30 => oversold.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::IndicatorError;

/// Compute the aligned RSI series for `closes` with the given `window`.
///
/// The output has the same length as the input.  Position `i` is defined
/// only when `window` deltas are available, i.e. from `i == window` onward
/// (deltas themselves start at position 1); everything before that is
/// `None` warm-up.
///
/// # Edge cases
/// - `window == 0` => `InvalidInput`
/// - fewer than 2 closes => `InvalidInput` (no delta can be formed)
/// - `closes.len() <= window` => every position is `None` (all warm-up),
///   mirroring the moving-average convention rather than erroring
/// - zero average loss => 100.0; zero average gain AND loss => 50.0
pub fn relative_strength_index(
    closes: &[f64],
    window: usize,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidInput("window must be at least 1"));
    }
    if closes.len() < 2 {
        return Err(IndicatorError::InvalidInput(
            "series must contain at least 2 closes",
        ));
    }

    // gains[j] / losses[j] correspond to the delta close[j+1] - close[j].
    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut result = vec![None; closes.len()];
    for i in window..closes.len() {
        // The window of deltas ending at close `i` spans delta indices
        // [i - window, i - 1].
        let avg_gain: f64 = gains[i - window..i].iter().sum::<f64>() / window as f64;
        let avg_loss: f64 = losses[i - window..i].iter().sum::<f64>() / window as f64;
        result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(result)
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - Both averages zero (flat window) => 50.0 (neutral).
/// - Average loss zero (only gains)   => 100.0 (saturated).
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Overbought / oversold classification of a defined RSI value.
///
/// The dashboard renders a warning banner for the non-neutral cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiSignal {
    /// Classify an RSI value: > 70 overbought, < 30 oversold, else neutral.
    pub fn classify(value: f64) -> Self {
        if value > 70.0 {
            Self::Overbought
        } else if value < 30.0 {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "overbought"),
            Self::Oversold => write!(f, "oversold"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}
