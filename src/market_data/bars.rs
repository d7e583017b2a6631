// =============================================================================
// Price bars — the validated daily OHLCV series
// =============================================================================
//
// `PriceSeries` is the only input the indicator engine accepts.  Validation
// happens once, at construction: dates strictly ascending with no
// duplicates, prices positive.  Non-trading days are simply absent — a gap
// between consecutive dates is legal, a zero-filled row is not.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading-day observation. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Violations detected when assembling a [`PriceSeries`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("bar {index} ({date}) is not after the previous bar's date")]
    OutOfOrder { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) has a non-positive price")]
    NonPositivePrice { index: usize, date: NaiveDate },
}

/// Ordered, validated sequence of daily bars, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Validate and wrap a vector of bars.
    ///
    /// Rejects empty input, non-ascending or duplicate dates, and
    /// non-positive prices. Volume is `u64`, so negative volume cannot be
    /// represented at all.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (i, bar) in bars.iter().enumerate() {
            if bar.open <= 0.0 || bar.high <= 0.0 || bar.low <= 0.0 || bar.close <= 0.0 {
                return Err(SeriesError::NonPositivePrice {
                    index: i,
                    date: bar.date,
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(SeriesError::OutOfOrder {
                    index: i,
                    date: bar.date,
                });
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        // A constructed series is never empty, but keep the pair complete.
        self.bars.is_empty()
    }

    /// Close prices in series order, the input to every indicator.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Summary statistics for the dashboard metric row.
    pub fn summary(&self) -> SummaryStats {
        let latest_close = self.bars.last().map(|b| b.close).unwrap_or(0.0);
        let mean_close =
            self.bars.iter().map(|b| b.close).sum::<f64>() / self.bars.len() as f64;
        let highest_high = self
            .bars
            .iter()
            .map(|b| b.high)
            .fold(f64::MIN, f64::max);
        let lowest_low = self.bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);

        SummaryStats {
            latest_close,
            mean_close,
            highest_high,
            lowest_low,
        }
    }
}

/// The four headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryStats {
    /// Most recent close ("Current Price").
    pub latest_close: f64,
    /// Mean close over the whole period ("Average Price").
    pub mean_close: f64,
    /// Highest high over the period.
    pub highest_high: f64,
    /// Lowest low over the period.
    pub lowest_low: f64,
}
