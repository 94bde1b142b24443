//! Domain types for image handling.

use std::sync::Arc;

use super::ItemId;

/// Where a resolved image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory LRU cache.
    MemoryCache,
    /// Downloaded and decoded.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A decoded image resolved for one item.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Item the image belongs to.
    pub id: ItemId,
    /// Decoded pixels, shared with the cache.
    pub image: Arc<image::DynamicImage>,
    /// Where the image was resolved from.
    pub source: ImageSource,
}

impl LoadedImage {
    #[must_use]
    pub const fn new(id: ItemId, image: Arc<image::DynamicImage>, source: ImageSource) -> Self {
        Self { id, image, source }
    }

    #[must_use]
    pub fn is_cache_hit(&self) -> bool {
        self.source == ImageSource::MemoryCache
    }
}
