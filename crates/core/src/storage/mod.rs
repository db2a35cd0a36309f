pub mod backend;
pub mod encryption;
pub mod format;
pub mod record_store;
#[cfg(not(target_arch = "wasm32"))]
pub mod sealed;
