use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::market::Quote;
use crate::models::settings::Settings;

use super::stooq::StooqQuoteProvider;
use super::traits::{QuoteProvider, TextFetcher};
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered list of quote providers.
///
/// The first provider that returns a usable quote wins; later ones are
/// only asked when the earlier ones fail.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Stooq CSV through `fetcher` first, then Yahoo Finance when a
    /// fallback ticker is configured.
    pub fn new_with_defaults(settings: &Settings, fetcher: Arc<dyn TextFetcher>) -> Self {
        let mut registry = Self::new();

        registry.register(Box::new(StooqQuoteProvider::new(
            fetcher,
            settings.quote_url.clone(),
            settings.quote_symbol.clone(),
        )));

        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(symbol) = &settings.fallback_symbol {
            match YahooFinanceProvider::new(symbol.clone()) {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance fallback disabled: {e}"),
            }
        }

        registry
    }

    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Ask each provider in turn. Quotes whose close is negative or not
    /// finite are treated as failures. Returns the last error when every
    /// provider fails.
    pub async fn latest_quote(&self) -> Result<Quote, CoreError> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.latest_quote().await {
                Ok(quote) if quote.close.is_finite() && quote.close >= 0.0 => return Ok(quote),
                Ok(quote) => {
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!("Invalid close price {}", quote.close),
                    });
                }
                Err(e) => {
                    log::debug!("Quote provider {} failed: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider("quotes".into())))
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
