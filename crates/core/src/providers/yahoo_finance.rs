use async_trait::async_trait;
use chrono::DateTime;

use crate::errors::CoreError;
use crate::models::market::Quote;
use super::traits::QuoteProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance quotes for a configured ticker.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs and most UCITS funds under their
///   exchange ticker (not their ISIN).
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
    symbol: String,
}

impl YahooFinanceProvider {
    pub fn new(symbol: impl Into<String>) -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self {
            connector,
            symbol: symbol.into(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn latest_quote(&self) -> Result<Quote, CoreError> {
        let symbol = &self.symbol;
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        let traded_at = DateTime::from_timestamp(quote.timestamp, 0).ok_or_else(|| {
            CoreError::data_format(PROVIDER, format!("invalid timestamp {}", quote.timestamp))
        })?;

        Ok(Quote {
            symbol: symbol.clone(),
            date: traded_at.format("%Y-%m-%d").to_string(),
            time: traded_at.format("%H:%M:%S").to_string(),
            open: Some(quote.open),
            high: Some(quote.high),
            low: Some(quote.low),
            close: quote.close,
            volume: Some(quote.volume as f64),
            name: symbol.clone(),
            source: PROVIDER.to_string(),
        })
    }
}
