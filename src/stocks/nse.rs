// =============================================================================
// NSE equity listing source — EQUITY_L.csv
// =============================================================================
//
// The NSE archives publish the full equity segment as a CSV with a SYMBOL
// and a "NAME OF COMPANY" column. This module is the fetch side of the
// stock directory; caching and fallback policy live in `directory.rs`.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

/// One listed equity: exchange symbol plus company name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockListing {
    pub symbol: String,
    pub name: String,
}

/// A source of the full symbol listing.
///
/// The directory is written against this trait so tests can inject a canned
/// or failing source instead of the live NSE archive.
pub trait StockListSource: Send + Sync {
    fn fetch(&self) -> impl std::future::Future<Output = Result<Vec<StockListing>>> + Send;
}

/// Live source: downloads and parses the NSE equity-segment CSV.
#[derive(Debug, Clone)]
pub struct NseCsvSource {
    url: String,
    client: reqwest::Client,
}

impl NseCsvSource {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            url: "https://archives.nseindia.com/content/equities/EQUITY_L.csv".to_string(),
            client,
        }
    }

    /// Point the source at a different URL (tests, mirrors).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Parse the EQUITY_L.csv body into listings.
    ///
    /// Column positions are resolved from the header row, so reordered or
    /// extended exports keep working. Rows missing either column are
    /// skipped.
    pub fn parse_listing_csv(body: &str) -> Result<Vec<StockListing>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .context("listing CSV has no header row")?
            .clone();
        let symbol_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("SYMBOL"))
            .context("listing CSV missing SYMBOL column")?;
        let name_col = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case("NAME OF COMPANY"))
            .context("listing CSV missing NAME OF COMPANY column")?;

        let mut listings = Vec::new();
        for record in reader.records() {
            let record = record.context("failed to read listing CSV record")?;
            let (Some(symbol), Some(name)) = (record.get(symbol_col), record.get(name_col))
            else {
                continue;
            };
            if symbol.is_empty() || name.is_empty() {
                continue;
            }
            listings.push(StockListing {
                symbol: symbol.to_string(),
                name: name.to_string(),
            });
        }

        Ok(listings)
    }
}

impl StockListSource for NseCsvSource {
    #[instrument(skip(self), name = "nse::fetch_listing")]
    async fn fetch(&self) -> Result<Vec<StockListing>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("GET EQUITY_L.csv request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("NSE archive returned {status}");
        }

        let body = resp
            .text()
            .await
            .context("failed to read EQUITY_L.csv body")?;

        let listings = Self::parse_listing_csv(&body)?;
        debug!(count = listings.len(), "NSE listing fetched");
        Ok(listings)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SYMBOL,NAME OF COMPANY,SERIES,DATE OF LISTING
RELIANCE,Reliance Industries Ltd.,EQ,29-NOV-1995
TCS,Tata Consultancy Services Ltd.,EQ,25-AUG-2004
INFY,Infosys Ltd.,EQ,08-FEB-1995
";

    #[test]
    fn parses_symbol_and_company_columns() {
        let listings = NseCsvSource::parse_listing_csv(SAMPLE).unwrap();
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].symbol, "RELIANCE");
        assert_eq!(listings[0].name, "Reliance Industries Ltd.");
        assert_eq!(listings[2].symbol, "INFY");
    }

    #[test]
    fn resolves_columns_by_header_not_position() {
        let reordered = "\
SERIES,NAME OF COMPANY,SYMBOL
EQ,HDFC Bank Ltd.,HDFCBANK
";
        let listings = NseCsvSource::parse_listing_csv(reordered).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].symbol, "HDFCBANK");
        assert_eq!(listings[0].name, "HDFC Bank Ltd.");
    }

    #[test]
    fn missing_symbol_column_is_an_error() {
        let bad = "TICKER,NAME OF COMPANY\nX,Y\n";
        assert!(NseCsvSource::parse_listing_csv(bad).is_err());
    }

    #[test]
    fn empty_cells_are_skipped() {
        let gappy = "\
SYMBOL,NAME OF COMPANY
RELIANCE,Reliance Industries Ltd.
,Orphan Row Ltd.
";
        let listings = NseCsvSource::parse_listing_csv(gappy).unwrap();
        assert_eq!(listings.len(), 1);
    }
}
