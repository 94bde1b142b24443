//! Image URL derivation from item ids.

use reqwest::Url;

use super::ItemId;

/// Placeholder substituted with the item id.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Default sprite location on the PokeAPI sprites repository.
pub const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{id}.png";

/// Fixed URL pattern where the item id is the only variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlTemplate {
    template: String,
}

impl ImageUrlTemplate {
    /// Creates a template. Returns `None` if it lacks the `{id}` placeholder.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        template
            .contains(ID_PLACEHOLDER)
            .then_some(Self { template })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Builds the image URL for `id`, or `None` if the result is not a valid URL.
    #[must_use]
    pub fn url_for(&self, id: ItemId) -> Option<Url> {
        Url::parse(&self.template.replace(ID_PLACEHOLDER, &id.to_string())).ok()
    }
}

impl Default for ImageUrlTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_IMAGE_URL_TEMPLATE.to_string(),
        }
    }
}
