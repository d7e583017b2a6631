// =============================================================================
// Stock directory — cached symbol → company-name lookup with fallback
// =============================================================================
//
// The directory is an explicit collaborator injected into AppState, not a
// process-global cache: refreshes happen only when a caller asks (startup
// prime, TTL expiry check, or the explicit refresh endpoint). When the live
// source fails the directory serves a built-in list of liquid large-cap NSE
// symbols and reports that provenance to the API, so the dashboard keeps
// working through an NSE archive outage.
// =============================================================================

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use super::nse::{StockListSource, StockListing};

/// Where the currently served listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingProvenance {
    /// Fetched from the NSE archive.
    Live,
    /// Built-in large-cap list (source unavailable or never fetched).
    Fallback,
}

struct Snapshot {
    listings: Vec<StockListing>,
    provenance: ListingProvenance,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Thread-safe cached stock listing with caller-controlled refresh.
pub struct StockDirectory {
    snapshot: RwLock<Snapshot>,
    ttl: chrono::Duration,
}

impl StockDirectory {
    /// Create a directory pre-seeded with the fallback list.
    ///
    /// `ttl_minutes` controls when `is_stale` starts reporting true after a
    /// successful refresh; it never triggers a refresh by itself.
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            snapshot: RwLock::new(Snapshot {
                listings: fallback_listings(),
                provenance: ListingProvenance::Fallback,
                refreshed_at: None,
            }),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }

    /// Current listing, sorted by symbol.
    pub fn listings(&self) -> Vec<StockListing> {
        self.snapshot.read().listings.clone()
    }

    /// Company name for an exact symbol match.
    pub fn company_name(&self, symbol: &str) -> Option<String> {
        self.snapshot
            .read()
            .listings
            .iter()
            .find(|l| l.symbol == symbol)
            .map(|l| l.name.clone())
    }

    pub fn provenance(&self) -> ListingProvenance {
        self.snapshot.read().provenance
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().refreshed_at
    }

    /// True when no live refresh has succeeded yet, or the last one is
    /// older than the TTL.
    pub fn is_stale(&self) -> bool {
        match self.snapshot.read().refreshed_at {
            None => true,
            Some(at) => Utc::now() - at > self.ttl,
        }
    }

    /// Refresh from `source`.
    ///
    /// On success the live listing replaces the snapshot (sorted by
    /// symbol). On failure the current snapshot is left untouched — which
    /// at worst is the built-in fallback the directory started with — and
    /// the outcome provenance is returned so callers can surface it.
    pub async fn refresh_from(&self, source: &impl StockListSource) -> ListingProvenance {
        match source.fetch().await {
            Ok(mut listings) if !listings.is_empty() => {
                listings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
                let count = listings.len();
                let mut snap = self.snapshot.write();
                snap.listings = listings;
                snap.provenance = ListingProvenance::Live;
                snap.refreshed_at = Some(Utc::now());
                drop(snap);
                info!(count, "stock directory refreshed from NSE");
                ListingProvenance::Live
            }
            Ok(_) => {
                warn!("NSE listing fetch returned no rows — keeping current directory");
                self.provenance()
            }
            Err(e) => {
                warn!(error = %e, "NSE listing fetch failed — keeping current directory");
                self.provenance()
            }
        }
    }
}

/// Built-in list of liquid NSE large-caps, served when the archive is
/// unreachable.
fn fallback_listings() -> Vec<StockListing> {
    let pairs = [
        ("ADANIENT", "Adani Enterprises Ltd."),
        ("ASIANPAINT", "Asian Paints Ltd."),
        ("BAJFINANCE", "Bajaj Finance Ltd."),
        ("BHARTIARTL", "Bharti Airtel Ltd."),
        ("HDFCBANK", "HDFC Bank Ltd."),
        ("HINDUNILVR", "Hindustan Unilever Ltd."),
        ("ICICIBANK", "ICICI Bank Ltd."),
        ("INFY", "Infosys Ltd."),
        ("ITC", "ITC Ltd."),
        ("KOTAKBANK", "Kotak Mahindra Bank Ltd."),
        ("MARUTI", "Maruti Suzuki India Ltd."),
        ("NYKAA", "FSN E-Commerce Ventures Ltd."),
        ("PAYTM", "One 97 Communications Ltd."),
        ("RELIANCE", "Reliance Industries Ltd."),
        ("SBIN", "State Bank of India"),
        ("TATAMOTORS", "Tata Motors Ltd."),
        ("TATASTEEL", "Tata Steel Ltd."),
        ("TCS", "Tata Consultancy Services Ltd."),
        ("TECHM", "Tech Mahindra Ltd."),
        ("TITAN", "Titan Company Ltd."),
        ("WIPRO", "Wipro Ltd."),
        ("ZOMATO", "Zomato Ltd."),
    ];

    pairs
        .iter()
        .map(|(symbol, name)| StockListing {
            symbol: symbol.to_string(),
            name: name.to_string(),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    struct CannedSource(Vec<StockListing>);

    impl StockListSource for CannedSource {
        async fn fetch(&self) -> Result<Vec<StockListing>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl StockListSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<StockListing>> {
            anyhow::bail!("connection refused")
        }
    }

    fn listing(symbol: &str, name: &str) -> StockListing {
        StockListing {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn starts_with_fallback_list() {
        let dir = StockDirectory::new(60);
        assert_eq!(dir.provenance(), ListingProvenance::Fallback);
        assert!(dir.is_stale());
        assert!(!dir.listings().is_empty());
        assert_eq!(
            dir.company_name("RELIANCE").as_deref(),
            Some("Reliance Industries Ltd.")
        );
        assert_eq!(dir.company_name("NOSUCH"), None);
    }

    #[tokio::test]
    async fn refresh_installs_sorted_live_listing() {
        let dir = StockDirectory::new(60);
        let source = CannedSource(vec![
            listing("TCS", "Tata Consultancy Services Ltd."),
            listing("INFY", "Infosys Ltd."),
        ]);

        let outcome = dir.refresh_from(&source).await;
        assert_eq!(outcome, ListingProvenance::Live);
        assert_eq!(dir.provenance(), ListingProvenance::Live);
        assert!(!dir.is_stale());

        let listings = dir.listings();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].symbol, "INFY");
        assert_eq!(listings[1].symbol, "TCS");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_fallback() {
        let dir = StockDirectory::new(60);
        let outcome = dir.refresh_from(&FailingSource).await;
        assert_eq!(outcome, ListingProvenance::Fallback);
        assert!(dir.is_stale());
        assert!(dir.company_name("HDFCBANK").is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_live_listing() {
        let dir = StockDirectory::new(60);
        dir.refresh_from(&CannedSource(vec![listing("SBIN", "State Bank of India")]))
            .await;

        let outcome = dir.refresh_from(&FailingSource).await;
        assert_eq!(outcome, ListingProvenance::Live);
        assert_eq!(dir.listings().len(), 1);
    }

    #[tokio::test]
    async fn empty_listing_is_not_installed() {
        let dir = StockDirectory::new(60);
        let outcome = dir.refresh_from(&CannedSource(vec![])).await;
        assert_eq!(outcome, ListingProvenance::Fallback);
        assert!(!dir.listings().is_empty());
    }

    #[tokio::test]
    async fn ttl_zero_makes_live_data_immediately_stale() {
        let dir = StockDirectory::new(0);
        dir.refresh_from(&CannedSource(vec![listing("ITC", "ITC Ltd.")]))
            .await;
        // Duration::minutes(0): anything older than "now" is stale.
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(dir.is_stale());
    }
}
