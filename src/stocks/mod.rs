pub mod directory;
pub mod nse;

pub use directory::{ListingProvenance, StockDirectory};
pub use nse::{NseCsvSource, StockListSource, StockListing};
