use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::market::{NewsItem, Quote};

/// Fetches a remote text document (CSV, RSS).
///
/// The production implementation goes through the proxy relay; tests swap
/// in canned bodies or failures.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TextFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, CoreError>;
}

/// Source of the latest quote for one fund.
///
/// Several providers can be registered; the registry tries them in order.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    async fn latest_quote(&self) -> Result<Quote, CoreError>;
}

/// Source of recent headlines.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// At most `limit` items, in feed order.
    async fn latest_headlines(&self, limit: usize) -> Result<Vec<NewsItem>, CoreError>;
}
