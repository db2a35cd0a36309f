use std::sync::Arc;

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::CoreError;
use crate::models::market::NewsItem;
use super::traits::{NewsProvider, TextFetcher};

/// Headlines from an RSS 2.0 feed.
pub struct RssNewsProvider {
    fetcher: Arc<dyn TextFetcher>,
    url: String,
}

impl RssNewsProvider {
    pub fn new(fetcher: Arc<dyn TextFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl NewsProvider for RssNewsProvider {
    fn name(&self) -> &str {
        "RSS"
    }

    async fn latest_headlines(&self, limit: usize) -> Result<Vec<NewsItem>, CoreError> {
        let body = self.fetcher.fetch_text(&self.url).await?;
        parse_rss_items(&body, limit)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Title,
    Link,
    PubDate,
}

#[derive(Default)]
struct ItemDraft {
    title: String,
    link: String,
    pub_date: String,
}

impl ItemDraft {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
        }
    }
}

/// Parse up to `limit` `<item>` elements, in document order.
///
/// Only the direct `title`, `link` and `pubDate` children are read; a
/// missing child leaves an empty string. CDATA sections are taken verbatim.
/// Parsing stops as soon as `limit` items are collected, so anything
/// malformed after that point goes unnoticed.
pub fn parse_rss_items(xml: &str, limit: usize) -> Result<Vec<NewsItem>, CoreError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<ItemDraft> = None;
    let mut field: Option<Field> = None;
    // Element depth inside the current item; children sit at depth 1.
    let mut depth = 0usize;

    while items.len() < limit {
        match reader.read_event()? {
            Event::Start(e) => {
                if current.is_some() {
                    depth += 1;
                    field = if depth == 1 {
                        match e.name().as_ref() {
                            b"title" => Some(Field::Title),
                            b"link" => Some(Field::Link),
                            b"pubDate" => Some(Field::PubDate),
                            _ => None,
                        }
                    } else {
                        None
                    };
                } else if e.name().as_ref() == b"item" {
                    current = Some(ItemDraft::default());
                    depth = 0;
                }
            }
            Event::Empty(e) => {
                if current.is_none() && e.name().as_ref() == b"item" {
                    items.push(NewsItem::new(String::new(), String::new(), String::new()));
                }
            }
            Event::End(e) => {
                if current.is_none() {
                    continue;
                }
                if depth == 0 && e.name().as_ref() == b"item" {
                    if let Some(draft) = current.take() {
                        items.push(NewsItem::new(draft.title, draft.link, draft.pub_date));
                    }
                } else {
                    depth = depth.saturating_sub(1);
                    field = None;
                }
            }
            Event::Text(t) => {
                if let (Some(draft), Some(f)) = (current.as_mut(), field) {
                    let text = t
                        .unescape()
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                    draft.field_mut(f).push_str(&text);
                }
            }
            Event::CData(c) => {
                if let (Some(draft), Some(f)) = (current.as_mut(), field) {
                    draft.field_mut(f).push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}
