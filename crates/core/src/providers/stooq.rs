use std::sync::Arc;

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::errors::CoreError;
use crate::models::market::Quote;
use super::traits::{QuoteProvider, TextFetcher};

const PROVIDER: &str = "Stooq";

/// Column order of the `f=sd2t2ohlcvn` export when no header line is sent.
const POSITIONAL: [&str; 9] = [
    "symbol", "date", "time", "open", "high", "low", "close", "volume", "name",
];

/// Latest quote from a Stooq CSV export (`s=…&f=sd2t2ohlcvn&e=csv`).
pub struct StooqQuoteProvider {
    fetcher: Arc<dyn TextFetcher>,
    url: String,
    symbol: String,
}

impl StooqQuoteProvider {
    /// `symbol` is only used when the CSV row leaves its symbol column empty.
    pub fn new(fetcher: Arc<dyn TextFetcher>, url: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            symbol: symbol.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for StooqQuoteProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn latest_quote(&self) -> Result<Quote, CoreError> {
        let body = self.fetcher.fetch_text(&self.url).await?;
        let mut quote = parse_quote_csv(&body)?;
        if quote.symbol.is_empty() {
            quote.symbol = self.symbol.clone();
        }
        Ok(quote)
    }
}

/// Parse a quote export: an optional header line followed by one data row.
///
/// The body must hold at least two non-empty lines; the second one is the
/// data row. When the first line names its columns (it has a `Close`
/// column, any case) fields are looked up by name, otherwise by position.
/// Only `close` is mandatory; the other prices and the volume are `None`
/// when the source reports them as `N/D`.
pub fn parse_quote_csv(body: &str) -> Result<Quote, CoreError> {
    let body = body.trim();
    if body.lines().count() < 2 {
        return Err(CoreError::data_format(
            "CSV",
            "expected a header line and a data row",
        ));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());
    let mut records = reader.records();
    let first = records
        .next()
        .transpose()?
        .ok_or_else(|| CoreError::data_format("CSV", "empty document"))?;
    let row = records
        .next()
        .transpose()?
        .ok_or_else(|| CoreError::data_format("CSV", "missing data row"))?;

    let columns = Columns::resolve(&first);
    let text = |name: &str| columns.get(&row, name).unwrap_or_default().to_string();
    let number = |name: &str| {
        columns
            .get(&row, name)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };

    let raw_close = columns.get(&row, "close").unwrap_or_default();
    let close = number("close").ok_or_else(|| {
        CoreError::data_format("CSV", format!("close price '{raw_close}' is not a number"))
    })?;

    Ok(Quote {
        symbol: text("symbol"),
        date: text("date"),
        time: text("time"),
        open: number("open"),
        high: number("high"),
        low: number("low"),
        close,
        volume: number("volume"),
        name: text("name"),
        source: PROVIDER.to_string(),
    })
}

/// Maps a column name to its index in the data row.
struct Columns {
    names: Vec<String>,
}

impl Columns {
    fn resolve(first: &StringRecord) -> Self {
        let names: Vec<String> = first.iter().map(|f| f.to_lowercase()).collect();
        if names.iter().any(|n| n == "close") {
            Self { names }
        } else {
            Self {
                names: POSITIONAL.iter().map(|n| n.to_string()).collect(),
            }
        }
    }

    fn get<'r>(&self, row: &'r StringRecord, name: &str) -> Option<&'r str> {
        let idx = self.names.iter().position(|n| n == name)?;
        row.get(idx)
    }
}
