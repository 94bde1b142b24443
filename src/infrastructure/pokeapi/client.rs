//! PokeAPI catalog HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::dto::PokemonListResponse;
use crate::domain::errors::FetchError;
use crate::domain::ports::{CatalogPort, RawEntry};
use crate::infrastructure::image::http_transport::DEFAULT_TIMEOUT_SECS;

/// Public PokeAPI endpoint.
pub const POKEAPI_BASE: &str = "https://pokeapi.co/api/v2";

/// Catalog source backed by the PokeAPI `pokemon` list endpoint.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Creates new client with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(POKEAPI_BASE, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates client with custom base URL and request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn list_url(&self) -> String {
        format!("{}/pokemon", self.base_url)
    }
}

#[async_trait]
impl CatalogPort for PokeApiClient {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<RawEntry>, FetchError> {
        debug!(limit, offset, "Fetching catalog page");

        let response = self
            .client
            .get(self.list_url())
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach catalog");
                FetchError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let page: PokemonListResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse catalog page");
            FetchError::decode(e.to_string())
        })?;

        debug!(
            returned = page.results.len(),
            total = ?page.count,
            has_next = page.next.is_some(),
            "Catalog page received"
        );

        Ok(page.results.into_iter().map(RawEntry::from).collect())
    }
}
