// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the dashboard
// charts: simple moving averages of the close and a rolling-mean RSI.
// Warm-up positions are represented as `None` so that every output column
// stays index-aligned with the input series; malformed requests (zero
// window, empty input) fail with a typed error instead of being silently
// corrected.

pub mod engine;
pub mod rsi;
pub mod sma;

pub use engine::{
    IndicatorSeries, LatestIndicators, MA_LONG_WINDOW, MA_SHORT_WINDOW, RSI_WINDOW,
};
pub use rsi::RsiSignal;

/// Error raised by the indicator functions on malformed input.
///
/// Degenerate numeric situations (flat market, zero average loss) are NOT
/// errors; they have defined values documented on the RSI function.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndicatorError {
    /// Empty series, zero window, or a series shorter than the minimum the
    /// requested computation needs.
    #[error("invalid indicator input: {0}")]
    InvalidInput(&'static str),
}
