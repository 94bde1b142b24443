//! Catalog item entity.

use reqwest::Url;

/// Stable identity of a catalog item, taken from its resource URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Parses the id from the final non-empty path segment of a resource URL.
    ///
    /// `https://pokeapi.co/api/v2/pokemon/25/` yields `25`. Returns `None`
    /// when that segment is not an integer.
    #[must_use]
    pub fn from_resource_url(url: &str) -> Option<Self> {
        url.split('/')
            .filter(|segment| !segment.is_empty())
            .next_back()
            .and_then(|segment| segment.parse().ok())
            .map(Self)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One catalog entry resolved into an id, a display name and an image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    display_name: String,
    image_url: Url,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, display_name: impl Into<String>, image_url: Url) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            image_url,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn image_url(&self) -> &Url {
        &self.image_url
    }
}

/// Upper-cases the first letter of every whitespace-delimited word and
/// lower-cases the rest, so `"mr-mime"` becomes `"Mr-mime"`.
#[must_use]
pub fn capitalize_words(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for ch in raw.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}
