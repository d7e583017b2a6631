pub mod bars;
pub mod yahoo;

// Re-export the core data types (e.g. `use crate::market_data::PriceSeries`).
pub use bars::{PriceBar, PriceSeries, SeriesError, SummaryStats};
pub use yahoo::YahooClient;
