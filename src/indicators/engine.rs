// =============================================================================
// Indicator Engine — derived columns for one price series
// =============================================================================
//
// Stateless assembly of the three derived series the dashboard charts:
// MA20, MA50 and RSI14 of the close.  Every invocation works on an
// immutable snapshot and allocates fresh output; nothing is cached between
// requests, so concurrent requests for different symbols need no
// coordination.
// =============================================================================

use serde::Serialize;

use crate::market_data::PriceSeries;

use super::rsi::{relative_strength_index, RsiSignal};
use super::sma::simple_moving_average;
use super::IndicatorError;

/// Window of the short moving average.
pub const MA_SHORT_WINDOW: usize = 20;
/// Window of the long moving average.
pub const MA_LONG_WINDOW: usize = 50;
/// Window of the relative strength index.
pub const RSI_WINDOW: usize = 14;

/// Derived indicator columns, parallel-indexed to the source `PriceSeries`.
///
/// `None` entries mark warm-up positions where insufficient history exists.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSeries {
    pub ma20: Vec<Option<f64>>,
    pub ma50: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.ma20.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ma20.is_empty()
    }

    /// The most recent value of each column plus the RSI classification —
    /// the dashboard's "Technical Indicators" metric block.
    pub fn latest(&self) -> LatestIndicators {
        let rsi = self.rsi.last().copied().flatten();
        LatestIndicators {
            ma20: self.ma20.last().copied().flatten(),
            ma50: self.ma50.last().copied().flatten(),
            rsi,
            rsi_signal: rsi.map(RsiSignal::classify),
        }
    }
}

/// Snapshot of the latest defined indicator values.
#[derive(Debug, Clone, Serialize)]
pub struct LatestIndicators {
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_signal: Option<RsiSignal>,
}

/// Compute the full indicator set for `series`.
///
/// The output columns always have exactly the same length as the input.  A
/// single-bar series cannot form a delta, so its RSI column is a lone
/// `None` rather than the `InvalidInput` that a direct
/// `relative_strength_index` call would raise; callers fetching one bar
/// still get an aligned, all-warm-up result.
pub fn enrich(series: &PriceSeries) -> Result<IndicatorSeries, IndicatorError> {
    let closes = series.closes();

    let ma20 = simple_moving_average(&closes, MA_SHORT_WINDOW)?;
    let ma50 = simple_moving_average(&closes, MA_LONG_WINDOW)?;
    let rsi = if closes.len() < 2 {
        vec![None; closes.len()]
    } else {
        relative_strength_index(&closes, RSI_WINDOW)?
    };

    debug_assert_eq!(ma20.len(), closes.len());
    debug_assert_eq!(ma50.len(), closes.len());
    debug_assert_eq!(rsi.len(), closes.len());

    Ok(IndicatorSeries { ma20, ma50, rsi })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::{PriceBar, PriceSeries};
    use chrono::NaiveDate;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                date: start + chrono::Days::new(i as u64),
                open: c,
                high: c + 1.0,
                low: (c - 1.0).max(0.01),
                close: c,
                volume: 1_000,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn enrich_columns_match_input_length() {
        let closes: Vec<f64> = (1..=60).map(|x| 100.0 + x as f64).collect();
        let series = series_from_closes(&closes);
        let out = enrich(&series).unwrap();
        assert_eq!(out.len(), 60);
        assert_eq!(out.ma20.len(), 60);
        assert_eq!(out.ma50.len(), 60);
        assert_eq!(out.rsi.len(), 60);
    }

    #[test]
    fn enrich_warmup_lengths_per_column() {
        let closes: Vec<f64> = (1..=60).map(|x| 100.0 + x as f64).collect();
        let out = enrich(&series_from_closes(&closes)).unwrap();
        assert_eq!(out.ma20.iter().take_while(|v| v.is_none()).count(), 19);
        assert_eq!(out.ma50.iter().take_while(|v| v.is_none()).count(), 49);
        assert_eq!(out.rsi.iter().take_while(|v| v.is_none()).count(), 14);
    }

    #[test]
    fn enrich_single_bar_is_all_warmup() {
        let out = enrich(&series_from_closes(&[100.0])).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.ma20[0], None);
        assert_eq!(out.ma50[0], None);
        assert_eq!(out.rsi[0], None);
    }

    #[test]
    fn enrich_is_deterministic() {
        let closes: Vec<f64> = (0..80).map(|x| 500.0 + (x as f64).cos() * 20.0).collect();
        let series = series_from_closes(&closes);
        let a = enrich(&series).unwrap();
        let b = enrich(&series).unwrap();
        for (x, y) in a.rsi.iter().zip(&b.rsi) {
            assert_eq!(x.map(f64::to_bits), y.map(f64::to_bits));
        }
        for (x, y) in a.ma20.iter().zip(&b.ma20) {
            assert_eq!(x.map(f64::to_bits), y.map(f64::to_bits));
        }
    }

    #[test]
    fn latest_block_classifies_rsi() {
        // Strictly rising closes: RSI pins at 100 => overbought.
        let closes: Vec<f64> = (1..=60).map(|x| 100.0 + x as f64).collect();
        let out = enrich(&series_from_closes(&closes)).unwrap();
        let latest = out.latest();
        assert!(latest.ma20.is_some());
        assert!(latest.ma50.is_some());
        assert_eq!(latest.rsi_signal, Some(RsiSignal::Overbought));
    }

    #[test]
    fn latest_block_empty_during_warmup() {
        let out = enrich(&series_from_closes(&[10.0, 11.0, 12.0])).unwrap();
        let latest = out.latest();
        assert_eq!(latest.ma20, None);
        assert_eq!(latest.rsi, None);
        assert_eq!(latest.rsi_signal, None);
    }
}
