use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Latest quote for the tracked fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    /// Trading date as reported by the source (e.g. "2025-01-15")
    pub date: String,
    /// Time of the last trade as reported by the source (e.g. "17:35:12")
    pub time: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
    pub name: String,
    /// Provider that produced this quote
    pub source: String,
}

impl Quote {
    /// Close price with two decimals, as displayed.
    pub fn display_price(&self) -> String {
        format!("{:.2}", self.close)
    }

    /// "{date} {time} UTC"
    pub fn display_timestamp(&self) -> String {
        format!("{} {} UTC", self.date, self.time)
    }
}

/// One headline from the news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Raw `pubDate` text
    pub pub_date: String,
    /// `pub_date` parsed as RFC 2822, when it parses
    pub published: Option<DateTime<FixedOffset>>,
}

impl NewsItem {
    pub fn new(title: String, link: String, pub_date: String) -> Self {
        let published = DateTime::parse_from_rfc2822(pub_date.trim()).ok();
        Self {
            title,
            link,
            pub_date,
            published,
        }
    }
}

/// Outcome of one fetch: either fresh content or the message to show instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedStatus<T> {
    Loaded(T),
    Unavailable { message: String },
}

impl<T> FeedStatus<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FeedStatus::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            FeedStatus::Loaded(value) => Some(value),
            FeedStatus::Unavailable { .. } => None,
        }
    }

    /// Message for the status line; `None` when content is shown.
    pub fn message(&self) -> Option<&str> {
        match self {
            FeedStatus::Loaded(_) => None,
            FeedStatus::Unavailable { message } => Some(message),
        }
    }
}
