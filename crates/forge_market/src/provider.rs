//! Volatility quote sources.

use std::time::Duration;

use crate::error::MarketError;

/// Default volatility index symbol.
pub const DEFAULT_INDEX_SYMBOL: &str = "^VIX";

/// Default quote endpoint (Yahoo-style chart API).
const DEFAULT_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Default request timeout; the pipeline must not hang on one quote.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Abstraction over the external quote source.
///
/// One implementation hits the live chart API; [`FixedVolatility`] pins a
/// value for tests and offline runs.
pub trait VolatilitySource {
    /// Returns the most recent close of the configured index.
    fn latest_close(&self) -> Result<f64, MarketError>;
}

/// Blocking HTTP source for a named market index.
///
/// Sends a single unauthenticated request with a short timeout; callers
/// must invoke this at most once per run.
#[derive(Clone, Debug)]
pub struct HttpIndexSource {
    symbol: String,
    endpoint: String,
    timeout: Duration,
}

impl Default for HttpIndexSource {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_SYMBOL)
    }
}

impl HttpIndexSource {
    /// Creates a source for the given index symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the quote endpoint (used by tests against a local stub).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured index symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl VolatilitySource for HttpIndexSource {
    fn latest_close(&self) -> Result<f64, MarketError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let url = format!(
            "{}/{}?range=1d&interval=1m",
            self.endpoint,
            urlencode(&self.symbol)
        );
        let payload: serde_json::Value = client.get(url).send()?.error_for_status()?.json()?;

        // chart.result[0].meta.regularMarketPrice is the latest close.
        let close = payload
            .pointer("/chart/result/0/meta/regularMarketPrice")
            .and_then(|v| v.as_f64())
            .ok_or(MarketError::EmptyResponse)?;
        Ok(close)
    }
}

/// Pinned volatility value for tests and offline runs.
#[derive(Clone, Copy, Debug)]
pub struct FixedVolatility(f64);

impl FixedVolatility {
    /// Creates a source that always returns `value`.
    pub fn new(value: f64) -> Self {
        Self(value)
    }
}

impl VolatilitySource for FixedVolatility {
    fn latest_close(&self) -> Result<f64, MarketError> {
        Ok(self.0)
    }
}

/// Percent-encodes the handful of characters index symbols carry (`^`).
fn urlencode(symbol: &str) -> String {
    symbol.replace('^', "%5E")
}
