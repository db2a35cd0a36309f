pub mod registry;
pub mod traits;

// Feed sources
pub mod proxy;
pub mod rss;
pub mod stooq;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
