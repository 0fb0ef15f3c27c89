//! Error types for the market context provider.

use thiserror::Error;

/// Volatility fetch errors. All of them are recoverable: callers fall
/// back to the documented constant.
#[derive(Debug, Error)]
pub enum MarketError {
    /// HTTP transport failure (includes timeouts).
    #[error("Quote request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload decoded but carried no usable close value.
    #[error("Quote response contained no close value")]
    EmptyResponse,

    /// Payload was not the expected JSON shape.
    #[error("Malformed quote payload: {0}")]
    Malformed(String),
}
