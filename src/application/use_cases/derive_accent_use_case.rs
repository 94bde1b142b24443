//! Accent color for the selected item.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::color_sampler::derive_color;
use crate::domain::entities::{AccentColor, Item};
use crate::domain::ports::ImageCachePort;

/// Derives the accent color of a newly selected item from its cached image.
#[derive(Clone)]
pub struct DeriveAccentUseCase {
    cache: Arc<dyn ImageCachePort>,
}

impl DeriveAccentUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(cache: Arc<dyn ImageCachePort>) -> Self {
        Self { cache }
    }

    /// Returns the accent color for `item`.
    ///
    /// `None` when the image is not cached yet or has no usable pixels; the
    /// caller keeps its previous color in that case.
    #[must_use]
    pub fn execute(&self, item: &Item) -> Option<AccentColor> {
        let Some(image) = self.cache.get(item.id()) else {
            debug!(id = %item.id(), "No cached image for selection");
            return None;
        };

        let color = derive_color(&image);
        debug!(id = %item.id(), color = ?color, "Derived accent color");
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ItemId;
    use crate::infrastructure::image::MemoryImageCache;
    use image::{DynamicImage, Rgba, RgbaImage};
    use reqwest::Url;

    fn item(id: i64) -> Item {
        Item::new(
            ItemId(id),
            "Charmander",
            Url::parse("https://sprites.example/4.png").unwrap(),
        )
    }

    #[test]
    fn test_uncached_item_has_no_color() {
        let use_case = DeriveAccentUseCase::new(Arc::new(MemoryImageCache::new(4)));
        assert!(use_case.execute(&item(4)).is_none());
    }

    #[test]
    fn test_cached_item_color() {
        let cache = Arc::new(MemoryImageCache::new(4));
        let sprite = RgbaImage::from_pixel(16, 16, Rgba([240, 128, 48, 255]));
        cache.put(ItemId(4), Arc::new(DynamicImage::ImageRgba8(sprite)));

        let use_case = DeriveAccentUseCase::new(cache);

        assert_eq!(
            use_case.execute(&item(4)),
            Some(AccentColor::new(240, 128, 48))
        );
    }
}
