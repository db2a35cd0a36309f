use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::models::market::{FeedStatus, NewsItem, Quote};
use crate::models::settings::Settings;
use crate::providers::proxy::ProxyRelay;
use crate::providers::registry::QuoteProviderRegistry;
use crate::providers::rss::RssNewsProvider;
use crate::providers::traits::{NewsProvider, TextFetcher};

/// Shown in place of the price when the quote cannot be fetched.
pub const QUOTE_UNAVAILABLE: &str = "Unable to fetch the live price. Please try again later.";

/// Shown in place of the headlines when the feed cannot be loaded.
pub const NEWS_UNAVAILABLE: &str = "Unable to load the news. Please try again later.";

/// Both feeds after one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub quote: FeedStatus<Quote>,
    pub news: FeedStatus<Vec<NewsItem>>,
}

/// Fetches the fund quote and the news headlines.
///
/// The two feeds fail independently. A failure never escapes as an error:
/// it is logged and replaced by a fixed message for the user.
pub struct MarketService {
    quotes: QuoteProviderRegistry,
    news: Box<dyn NewsProvider>,
    news_limit: usize,
}

impl MarketService {
    pub fn new(quotes: QuoteProviderRegistry, news: Box<dyn NewsProvider>, news_limit: usize) -> Self {
        Self {
            quotes,
            news,
            news_limit,
        }
    }

    /// Production wiring: both feeds go through the configured relay.
    pub fn from_settings(settings: &Settings) -> Self {
        let relay: Arc<dyn TextFetcher> = Arc::new(ProxyRelay::new(
            settings.relay_base_url.clone(),
            settings.request_timeout_secs,
        ));
        let quotes = QuoteProviderRegistry::new_with_defaults(settings, Arc::clone(&relay));
        let news = RssNewsProvider::new(relay, settings.news_url.clone());
        Self::new(quotes, Box::new(news), settings.news_limit)
    }

    pub fn news_limit(&self) -> usize {
        self.news_limit
    }

    pub fn quote_providers(&self) -> Vec<&str> {
        self.quotes.names()
    }

    pub async fn fetch_quote(&self) -> FeedStatus<Quote> {
        match self.quotes.latest_quote().await {
            Ok(quote) => {
                log::info!(
                    "Quote for {} from {}: {} at {}",
                    quote.symbol,
                    quote.source,
                    quote.display_price(),
                    quote.display_timestamp()
                );
                FeedStatus::Loaded(quote)
            }
            Err(e) => {
                log::warn!("Quote fetch failed: {e}");
                FeedStatus::Unavailable {
                    message: QUOTE_UNAVAILABLE.to_string(),
                }
            }
        }
    }

    pub async fn fetch_news(&self) -> FeedStatus<Vec<NewsItem>> {
        match self.news.latest_headlines(self.news_limit).await {
            Ok(items) => {
                log::info!("Loaded {} headlines from {}", items.len(), self.news.name());
                FeedStatus::Loaded(items)
            }
            Err(e) => {
                log::warn!("News fetch failed: {e}");
                FeedStatus::Unavailable {
                    message: NEWS_UNAVAILABLE.to_string(),
                }
            }
        }
    }

    /// Fetch both feeds concurrently.
    pub async fn refresh_all(&self) -> MarketSnapshot {
        let (quote, news) = futures::join!(self.fetch_quote(), self.fetch_news());
        MarketSnapshot { quote, news }
    }
}

impl std::fmt::Debug for MarketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketService")
            .field("quote_providers", &self.quotes.names())
            .field("news", &self.news.name())
            .field("news_limit", &self.news_limit)
            .finish()
    }
}

/// Re-fetch the quote every `every`, publishing each result.
///
/// The first fetch happens one period after the call; the startup fetch is
/// `refresh_all`'s job. Ticks missed while a request is in flight are
/// delayed, not stacked. The task ends once every receiver is dropped.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_quote_poller(
    service: Arc<MarketService>,
    every: Duration,
) -> (
    tokio::sync::watch::Receiver<Option<FeedStatus<Quote>>>,
    tokio::task::JoinHandle<()>,
) {
    use tokio::time::{interval_at, Instant, MissedTickBehavior};

    let every = every.max(Duration::from_millis(1));
    let (tx, rx) = tokio::sync::watch::channel(None);
    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tx.closed() => break,
            }
            let status = service.fetch_quote().await;
            if tx.send(Some(status)).is_err() {
                break;
            }
        }
        log::debug!("Quote poller stopped");
    });
    (rx, handle)
}
