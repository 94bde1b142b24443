//! Port for downloading raw image bytes.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use crate::domain::errors::FetchError;

/// Byte transport for image downloads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageTransportPort: Send + Sync {
    /// Downloads the body at `url`.
    async fn fetch_bytes(&self, url: &Url) -> Result<Bytes, FetchError>;
}
