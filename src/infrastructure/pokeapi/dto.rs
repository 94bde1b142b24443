use serde::Deserialize;

use crate::domain::ports::RawEntry;

/// PokeAPI named-resource list response.
#[derive(Debug, Deserialize)]
pub struct PokemonListResponse {
    /// Total number of resources in the catalog.
    #[serde(default)]
    pub count: Option<u64>,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// Entries on this page.
    pub results: Vec<PokemonListItem>,
}

/// One named resource on a list page.
#[derive(Debug, Deserialize)]
pub struct PokemonListItem {
    /// Lower-case resource name.
    pub name: String,
    /// Canonical resource URL.
    pub url: String,
}

impl From<PokemonListItem> for RawEntry {
    fn from(item: PokemonListItem) -> Self {
        Self::new(item.name, item.url)
    }
}
