// src/ingest/types.rs
use async_trait::async_trait;

use crate::fetch::{FetchError, Fetcher};
use crate::listing::Listing;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
    #[error("{adapter} did not finish within {secs}s")]
    Timeout { adapter: String, secs: u64 },
    #[error("{adapter} panicked: {message}")]
    Panicked { adapter: String, message: String },
}

/// One external listing site.
///
/// Implementations own their selectors and region rules; the aggregator only sees
/// canonical listings or an error, which it turns into "nothing this cycle".
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;
    async fn extract(&self, fetch: &dyn Fetcher) -> Result<Vec<Listing>, AdapterError>;
}
