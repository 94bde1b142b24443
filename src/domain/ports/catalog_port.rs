//! Port for reading pages of the remote catalog.

use async_trait::async_trait;

use crate::domain::errors::FetchError;

/// One unprocessed catalog entry as the catalog returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Lower-case resource name.
    pub name: String,
    /// Canonical resource URL; its last path segment is the item id.
    pub url: String,
}

impl RawEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Port for paginated catalog access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fetches up to `limit` entries starting at `offset`, in catalog order.
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<RawEntry>, FetchError>;
}
