use std::fmt;

/// Failures that escape a whole request. Per-coin problems never surface here; they are
/// logged and the coin is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// The provider could not be reached or answered with a non-success status.
    Unavailable(String),
    /// The provider answered, but without the fields the response needs.
    Malformed(String),
    /// The provider has no record for the requested coin.
    NotFound(String),
}

impl MarketError {
    pub fn message(&self) -> &str {
        match self {
            MarketError::Unavailable(msg)
            | MarketError::Malformed(msg)
            | MarketError::NotFound(msg) => msg,
        }
    }
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::Unavailable(msg) => write!(f, "market data unavailable: {msg}"),
            MarketError::Malformed(msg) => write!(f, "malformed market data: {msg}"),
            MarketError::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for MarketError {}
