// =============================================================================
// Yahoo Finance chart client — historical daily bars for NSE symbols
// =============================================================================
//
// Public endpoint, no signing. NSE equities are quoted on Yahoo under the
// `.NS` suffix (e.g. RELIANCE.NS). The v8 chart response is a column-
// oriented JSON document: one `timestamp` array plus parallel open / high /
// low / close / volume arrays under `indicators.quote[0]`. Rows with null
// cells (halted sessions, missing quotes) are skipped rather than
// zero-filled.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument, warn};

use crate::types::Period;

use super::{PriceBar, PriceSeries};

/// Yahoo quotes NSE equities under this suffix.
const NSE_SUFFIX: &str = ".NS";

/// Some Yahoo edge nodes reject requests without a browser-ish user agent.
const UA: &str = "Mozilla/5.0 (compatible; marketdeck/1.0)";

/// HTTP client for the Yahoo Finance v8 chart API.
#[derive(Debug, Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a new client with the given request timeout.
    pub fn new(timeout_secs: u64) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(UA));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            client,
        }
    }

    /// Point the client at a different host (tests, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch daily bars for `symbol` covering the trailing `period`.
    ///
    /// The symbol is the bare NSE code ("RELIANCE"); the `.NS` suffix is
    /// appended here. An empty result set is an error — the caller shows
    /// the same "no data found" message the dashboard always has.
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    pub async fn fetch_daily(&self, symbol: &str, period: Period) -> Result<PriceSeries> {
        let period2 = Utc::now().timestamp();
        let period1 = period2 - period.days() * 86_400;
        let url = format!(
            "{}/v8/finance/chart/{}{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, NSE_SUFFIX, period1, period2
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse chart response")?;

        if !status.is_success() {
            anyhow::bail!("Yahoo chart API returned {}: {}", status, body);
        }

        let bars = Self::parse_chart_response(&body)
            .with_context(|| format!("malformed chart payload for {symbol}"))?;

        if bars.is_empty() {
            anyhow::bail!("no data found for {symbol}");
        }

        let series = PriceSeries::new(bars)
            .with_context(|| format!("invalid bar sequence for {symbol}"))?;

        debug!(symbol, period = %period, count = series.len(), "daily bars fetched");
        Ok(series)
    }

    // -------------------------------------------------------------------------
    // Response parsing
    // -------------------------------------------------------------------------

    /// Extract bars from a v8 chart document.
    ///
    /// Rows are dropped when any OHLCV cell is null, and when a row does not
    /// advance the calendar date (Yahoo appends the live in-progress bar
    /// with a same-day timestamp during trading hours).
    pub fn parse_chart_response(body: &serde_json::Value) -> Result<Vec<PriceBar>> {
        let chart = &body["chart"];

        if !chart["error"].is_null() {
            anyhow::bail!("chart API error: {}", chart["error"]);
        }

        let result = chart["result"]
            .as_array()
            .and_then(|arr| arr.first())
            .context("chart response missing 'result'")?;

        // A symbol with no trades in the range has no timestamp array.
        let Some(timestamps) = result["timestamp"].as_array() else {
            return Ok(Vec::new());
        };

        let quote = result["indicators"]["quote"]
            .as_array()
            .and_then(|arr| arr.first())
            .context("chart response missing 'indicators.quote'")?;

        let opens = quote["open"].as_array().context("missing 'open' column")?;
        let highs = quote["high"].as_array().context("missing 'high' column")?;
        let lows = quote["low"].as_array().context("missing 'low' column")?;
        let closes = quote["close"].as_array().context("missing 'close' column")?;
        let volumes = quote["volume"]
            .as_array()
            .context("missing 'volume' column")?;

        let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
        let mut last_date: Option<NaiveDate> = None;

        for (i, ts) in timestamps.iter().enumerate() {
            let Some(ts) = ts.as_i64() else {
                warn!(row = i, "skipping row with non-numeric timestamp");
                continue;
            };
            let date = match DateTime::from_timestamp(ts, 0) {
                Some(dt) => dt.date_naive(),
                None => {
                    warn!(row = i, ts, "skipping row with out-of-range timestamp");
                    continue;
                }
            };

            // All five cells must be present; halted/missing rows are null.
            let cells = (
                opens.get(i).and_then(|v| v.as_f64()),
                highs.get(i).and_then(|v| v.as_f64()),
                lows.get(i).and_then(|v| v.as_f64()),
                closes.get(i).and_then(|v| v.as_f64()),
                volumes.get(i).and_then(|v| v.as_u64()),
            );
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = cells else {
                debug!(row = i, %date, "skipping row with null quote cells");
                continue;
            };

            if last_date.is_some_and(|prev| date <= prev) {
                debug!(row = i, %date, "skipping row that does not advance the date");
                continue;
            }
            last_date = Some(date);

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(bars)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn chart_fixture(timestamps: &str, quote: &str, error: &str) -> serde_json::Value {
        let raw = format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "timestamp": {timestamps},
                        "indicators": {{ "quote": [{quote}] }}
                    }}],
                    "error": {error}
                }}
            }}"#
        );
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn parses_plain_rows() {
        // 2024-01-02 and 2024-01-03, 05:30 IST open (UTC timestamps).
        let body = chart_fixture(
            "[1704171600, 1704258000]",
            r#"{
                "open":   [100.0, 102.5],
                "high":   [104.0, 106.0],
                "low":    [ 99.0, 101.0],
                "close":  [102.0, 105.5],
                "volume": [12000, 15000]
            }"#,
            "null",
        );
        let bars = YahooClient::parse_chart_response(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, "2024-01-02".parse::<NaiveDate>().unwrap());
        assert_eq!(bars[1].close, 105.5);
        assert_eq!(bars[1].volume, 15_000);
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn skips_null_quote_rows() {
        let body = chart_fixture(
            "[1704171600, 1704258000, 1704344400]",
            r#"{
                "open":   [100.0, null, 103.0],
                "high":   [104.0, null, 107.0],
                "low":    [ 99.0, null, 102.0],
                "close":  [102.0, null, 106.0],
                "volume": [12000, null, 16000]
            }"#,
            "null",
        );
        let bars = YahooClient::parse_chart_response(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 102.0);
        assert_eq!(bars[1].close, 106.0);
    }

    #[test]
    fn drops_same_day_live_bar() {
        // Second timestamp is later the same day — the in-progress candle.
        let body = chart_fixture(
            "[1704171600, 1704190000]",
            r#"{
                "open":   [100.0, 102.0],
                "high":   [104.0, 103.0],
                "low":    [ 99.0, 101.0],
                "close":  [102.0, 102.5],
                "volume": [12000, 500]
            }"#,
            "null",
        );
        let bars = YahooClient::parse_chart_response(&body).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].volume, 12_000);
    }

    #[test]
    fn missing_timestamp_array_is_empty_not_error() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{ "chart": { "result": [ { "meta": {} } ], "error": null } }"#,
        )
        .unwrap();
        assert!(YahooClient::parse_chart_response(&body).unwrap().is_empty());
    }

    #[test]
    fn surfaces_chart_error_object() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{ "chart": { "result": null,
                 "error": { "code": "Not Found", "description": "No data found" } } }"#,
        )
        .unwrap();
        let err = YahooClient::parse_chart_response(&body).unwrap_err();
        assert!(err.to_string().contains("chart API error"));
    }
}
