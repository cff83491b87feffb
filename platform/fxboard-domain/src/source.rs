use async_trait::async_trait;

use crate::quote::QuoteRecord;

/// Why a fetch failed. Every variant degrades the same way (the previous
/// quote set is retained); the split exists for log fidelity.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    Transport(String),
    Status { code: u16, message: String },
    Decode(String),
    MissingSymbol(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Transport(msg) => write!(f, "transport: {msg}"),
            FeedError::Status { code, message } => write!(f, "status {code}: {message}"),
            FeedError::Decode(msg) => write!(f, "decode: {msg}"),
            FeedError::MissingSymbol(symbol) => write!(f, "missing symbol: {symbol}"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Port for anything that can produce the full quote set in one call: the
/// upstream provider adapter on the gateway side, the `/api/forex` client on
/// the dashboard side, and test stubs.
///
/// A fetch is all-or-nothing; implementations never return a partial set.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<QuoteRecord>, FeedError>;
}
