// =============================================================================
// Central Application State — MarketDeck dashboard backend
// =============================================================================
//
// Everything the API handlers need, tied together behind one `Arc`.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock around the runtime config.
//   - The directory manages its own interior mutability; the quote client
//     and listing source are immutable after construction.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::market_data::YahooClient;
use crate::runtime_config::RuntimeConfig;
use crate::stocks::{NseCsvSource, StockDirectory};

/// Central application state shared across handlers via `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, incremented on every
    /// meaningful state mutation (config change, directory refresh).
    pub state_version: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    /// Symbol → company-name directory with caller-controlled refresh.
    pub directory: Arc<StockDirectory>,
    /// Live listing source injected into directory refreshes.
    pub listing_source: NseCsvSource,

    /// Historical quote client.
    pub quotes: YahooClient,

    /// Instant when the server was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct a new `AppState` from the given runtime configuration.
    ///
    /// The returned value is typically wrapped in `Arc` immediately.
    pub fn new(config: RuntimeConfig) -> Self {
        let timeout = config.http_timeout_secs;
        let ttl = config.directory_ttl_minutes;

        Self {
            state_version: AtomicU64::new(0),
            runtime_config: Arc::new(RwLock::new(config)),
            directory: Arc::new(StockDirectory::new(ttl)),
            listing_source: NseCsvSource::new(timeout),
            quotes: YahooClient::new(timeout),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::Relaxed)
    }

    pub fn increment_version(&self) {
        self.state_version.fetch_add(1, Ordering::Relaxed);
    }

    /// Refresh the directory if it has gone stale, then bump the version
    /// when the refresh actually changed anything.
    pub async fn refresh_directory_if_stale(&self) {
        if self.directory.is_stale() {
            self.directory.refresh_from(&self.listing_source).await;
            self.increment_version();
        }
    }
}
