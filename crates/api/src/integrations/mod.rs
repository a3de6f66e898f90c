//! HTTP clients for the external providers.
//!
//! Each provider is exposed to handlers through an `async_trait` so the
//! router can run against a fake in tests. Configs load from the environment
//! and are `None` when credentials are missing.

pub mod cloudinary;
pub mod mercadopago;
pub mod stripe;

use std::time::Duration;

/// Timeout applied to every outbound provider request.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read a non-empty environment variable.
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}
