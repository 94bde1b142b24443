//! HTTP image transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::domain::errors::FetchError;
use crate::domain::ports::ImageTransportPort;

/// Default request timeout for image downloads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Downloads image bytes over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageTransport {
    client: Client,
}

impl HttpImageTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageTransportPort for HttpImageTransport {
    async fn fetch_bytes(&self, url: &Url) -> Result<Bytes, FetchError> {
        debug!(url = %url, "Downloading image");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Image request failed");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(format!("failed to read body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        assert!(HttpImageTransport::new(DEFAULT_TIMEOUT_SECS).is_ok());
    }
}
