use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::TextFetcher;

/// Build the relay URL for `target`: `{base}?url={percent-encoded target}`.
pub fn relay_url(base: &str, target: &str) -> String {
    format!("{base}?url={}", urlencoding::encode(target))
}

/// Fetches third-party documents through a public CORS relay.
///
/// The relay returns the target's body verbatim. Every request asks for a
/// fresh copy (`Cache-Control: no-cache`); any non-success status is a
/// network failure.
#[derive(Debug, Clone)]
pub struct ProxyRelay {
    client: Client,
    base_url: String,
}

impl ProxyRelay {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, target: &str) -> String {
        relay_url(&self.base_url, target)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TextFetcher for ProxyRelay {
    async fn fetch_text(&self, url: &str) -> Result<String, CoreError> {
        let relayed = self.url_for(url);
        log::debug!("Fetching {url} through relay");
        let body = self
            .client
            .get(&relayed)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}
