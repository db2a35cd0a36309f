use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use crate::errors::CoreError;
use crate::models::chart::ChartSize;

/// Storage key of the investment list.
pub const DEFAULT_STORAGE_KEY: &str = "investissements_arnaud";

/// Public CORS relay used to reach third-party feeds.
pub const DEFAULT_RELAY_BASE_URL: &str = "https://api.allorigins.win/raw";

/// Stooq CSV endpoint: symbol, date, time, open, high, low, close, volume, name.
pub const DEFAULT_QUOTE_URL: &str =
    "https://stooq.com/q/l/?s=ie0002xzsho1&f=sd2t2ohlcvn&e=csv";

pub const DEFAULT_QUOTE_SYMBOL: &str = "IE0002XZSHO1";

pub const DEFAULT_NEWS_URL: &str = "https://www.bfmtv.com/rss/news-24-7/";

/// User-configurable settings. Every field has a default, so a settings
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key under which the investment list is persisted.
    pub storage_key: String,

    /// Relay endpoint; the target URL is passed as its `url` query parameter.
    pub relay_base_url: String,

    /// CSV quote endpoint (fetched through the relay).
    pub quote_url: String,

    /// Display symbol of the tracked fund.
    pub quote_symbol: String,

    /// Yahoo Finance ticker tried when the CSV source fails.
    pub fallback_symbol: Option<String>,

    /// RSS feed (fetched through the relay).
    pub news_url: String,

    /// Maximum number of headlines kept.
    pub news_limit: usize,

    /// Quote re-poll interval.
    pub quote_refresh_secs: u64,

    /// Per-request timeout.
    pub request_timeout_secs: u64,

    pub pie_chart: ChartSize,
    pub line_chart: ChartSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            relay_base_url: DEFAULT_RELAY_BASE_URL.to_string(),
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            quote_symbol: DEFAULT_QUOTE_SYMBOL.to_string(),
            fallback_symbol: None,
            news_url: DEFAULT_NEWS_URL.to_string(),
            news_limit: 5,
            quote_refresh_secs: 60,
            request_timeout_secs: 30,
            pie_chart: ChartSize::new(400.0, 300.0),
            line_chart: ChartSize::new(800.0, 400.0),
        }
    }
}

impl Settings {
    /// Parse settings from TOML; absent fields keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let settings: Settings = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a TOML settings file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("storage_key", &self.storage_key),
            ("relay_base_url", &self.relay_base_url),
            ("quote_url", &self.quote_url),
            ("news_url", &self.news_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ValidationError(format!(
                    "Setting '{field}' must not be empty"
                )));
            }
        }
        if self.news_limit == 0 {
            return Err(CoreError::ValidationError(
                "Setting 'news_limit' must be at least 1".into(),
            ));
        }
        if self.quote_refresh_secs == 0 {
            return Err(CoreError::ValidationError(
                "Setting 'quote_refresh_secs' must be at least 1".into(),
            ));
        }
        for (field, size) in [("pie_chart", self.pie_chart), ("line_chart", self.line_chart)] {
            if !(size.width > 0.0 && size.height > 0.0) {
                return Err(CoreError::ValidationError(format!(
                    "Setting '{field}' must have a positive width and height"
                )));
            }
        }
        Ok(())
    }
}
